//! Handlers for link management endpoints.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::PaginationParams;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link with a random 6-character alias.
///
/// # Endpoint
///
/// `POST /link`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "url": "https://example.com",
///   "hash": "aB3xZ9",
///   "created_at": "2025-03-01T12:00:00Z",
///   "updated_at": "2025-03-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is invalid or no free alias was found
/// - 409 if the insert lost a race against a concurrent insert twice
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.create_link(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists live links ordered by id.
///
/// # Endpoint
///
/// `GET /link?limit=25&offset=0`
pub async fn list_links_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(params) = params?;

    let (limit, offset) = params
        .validate_and_get_limit_offset()
        .map_err(|e| AppError::bad_request("Invalid pagination parameters", json!({ "reason": e })))?;

    let (links, count) = state.link_service.list_links(limit, offset).await?;

    Ok(Json(LinkListResponse {
        links: links.into_iter().map(LinkResponse::from).collect(),
        count,
    }))
}

/// Points a link at a new target URL.
///
/// # Endpoint
///
/// `PATCH /link/{id}` (Bearer token required)
///
/// # Errors
///
/// - 400 if the URL is invalid
/// - 404 if the link does not exist or was deleted
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.update_link(id, &payload.url).await?;
    tracing::info!(link_id = id, user = %user.email, "Link updated");

    Ok(Json(link.into()))
}

/// Soft-deletes a link. Its alias stops resolving immediately.
///
/// # Endpoint
///
/// `DELETE /link/{id}` (Bearer token required)
///
/// # Response
///
/// `204 No Content`, or 404 if the link does not exist or is already deleted.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    state.link_service.delete_link(id).await?;
    tracing::info!(link_id = id, user = %user.email, "Link deleted");

    Ok(StatusCode::NO_CONTENT)
}
