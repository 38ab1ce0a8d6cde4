//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Body of `POST /link`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL (must be absolute HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Body of `PATCH /link/{id}`. Only the target can change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// A link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.url,
            hash: link.hash,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Page of live links plus the total number of live links.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    pub count: i64,
}
