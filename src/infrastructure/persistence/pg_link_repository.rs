//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, url, hash, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    url: String,
    hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.url, r.hash, r.created_at, r.updated_at, r.deleted_at)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Alias uniqueness among live links is enforced by the partial unique index
/// `links_hash_active_key`; a violation surfaces as [`AppError::DuplicateAlias`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (url, hash) VALUES ($1, $2) RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.url)
        .bind(&new_link.hash)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::DuplicateAlias { .. } => AppError::DuplicateAlias {
                alias: Some(new_link.hash.clone()),
            },
            other => other,
        })?;

        Ok(row.into())
    }

    async fn exists_by_hash(&self, hash: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM links WHERE hash = $1 AND deleted_at IS NULL)",
        )
        .bind(hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE hash = $1 AND deleted_at IS NULL"
        ))
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links WHERE deleted_at IS NULL")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn update_url(&self, id: i64, url: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET url = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
