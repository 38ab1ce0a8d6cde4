//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL: the mapping from a 6-character alias (`hash`) to a target URL.
///
/// Links are never removed; deletion sets `deleted_at` and frees the alias for
/// reuse by later links.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        url: String,
        hash: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            url,
            hash,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub url: String,
    pub hash: String,
}
