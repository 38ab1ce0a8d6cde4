//! Link creation, resolution and management service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::alias::{generate_unique_alias, is_valid_alias};
use crate::utils::target_url::validate_target_url;
use serde_json::json;

/// Default number of alias candidates tried before giving up.
pub const DEFAULT_ALIAS_MAX_ATTEMPTS: usize = 10;

/// Service for creating, resolving and managing short links.
///
/// Owns the alias collision policy: up to `max_attempts` candidates are
/// checked against the store, and an insert that loses a race against a
/// concurrent insert of the same alias is retried once from scratch.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    max_attempts: usize,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>, max_attempts: usize) -> Self {
        Self {
            links,
            max_attempts,
        }
    }

    /// Creates a short link with a fresh random alias.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `url` is not an absolute HTTP(S) URL
    /// - [`AppError::AliasSpaceExhausted`] if every candidate collided
    /// - [`AppError::DuplicateAlias`] if the insert lost a race twice
    pub async fn create_link(&self, url: &str) -> Result<Link, AppError> {
        let url = validate_target_url(url)?;

        match self.insert_with_fresh_alias(&url).await {
            Err(AppError::DuplicateAlias { alias }) => {
                tracing::warn!(?alias, "Alias taken between check and insert, retrying once");
                self.insert_with_fresh_alias(&url).await
            }
            result => result,
        }
    }

    async fn insert_with_fresh_alias(&self, url: &str) -> Result<Link, AppError> {
        let links = self.links.clone();
        let hash = generate_unique_alias(self.max_attempts, move |candidate| {
            let links = links.clone();
            async move { links.exists_by_hash(&candidate).await }
        })
        .await?;

        let link = self
            .links
            .create(NewLink {
                url: url.to_string(),
                hash,
            })
            .await?;

        tracing::info!(link_id = link.id, hash = %link.hash, "Short link created");
        Ok(link)
    }

    /// Finds the live link behind an alias.
    ///
    /// Malformed aliases are reported as not found without a store lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link holds the alias.
    pub async fn resolve_alias(&self, alias: &str) -> Result<Link, AppError> {
        if !is_valid_alias(alias) {
            return Err(Self::alias_not_found(alias));
        }

        self.links
            .find_by_hash(alias)
            .await?
            .ok_or_else(|| Self::alias_not_found(alias))
    }

    /// Lists live links by ascending id, with the total live count.
    pub async fn list_links(&self, limit: i64, offset: i64) -> Result<(Vec<Link>, i64), AppError> {
        let links = self.links.list(limit, offset).await?;
        let count = self.links.count().await?;
        Ok((links, count))
    }

    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.links.count().await
    }

    /// Points an existing link at a new target. The alias is unchanged.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `url` is invalid
    /// - [`AppError::NotFound`] if the link does not exist or was deleted
    pub async fn update_link(&self, id: i64, url: &str) -> Result<Link, AppError> {
        let url = validate_target_url(url)?;

        self.links
            .update_url(id, &url)
            .await?
            .ok_or_else(|| Self::id_not_found(id))
    }

    /// Soft-deletes a link. Its alias becomes available again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is already deleted.
    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        if !self.links.soft_delete(id).await? {
            return Err(Self::id_not_found(id));
        }

        Ok(())
    }

    fn alias_not_found(alias: &str) -> AppError {
        AppError::not_found("Short link not found", json!({ "hash": alias }))
    }

    fn id_not_found(id: i64) -> AppError {
        AppError::not_found("Link not found", json!({ "id": id }))
    }
}
