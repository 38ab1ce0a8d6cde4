//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users, newest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}
