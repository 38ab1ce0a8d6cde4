//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// All lookups ignore soft-deleted links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateAlias`] if a live link already holds `new_link.hash`.
    /// The store's uniqueness constraint is the final arbiter for concurrent inserts.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Point lookup: does a live link use this alias?
    async fn exists_by_hash(&self, hash: &str) -> Result<bool, AppError>;

    /// Finds a live link by its alias.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError>;

    /// Lists live links ordered by id ascending.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>, AppError>;

    /// Counts live links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Replaces the target URL of a live link and bumps `updated_at`.
    ///
    /// Returns `Ok(None)` if no live link has this id.
    async fn update_url(&self, id: i64, url: &str) -> Result<Option<Link>, AppError>;

    /// Soft-deletes a link by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(true)` if the link was found and deleted, `Ok(false)` if not found
    /// or already deleted.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;
}
