//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::Method,
    response::{IntoResponse, Redirect},
};

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its target URL.
///
/// # Endpoint
///
/// `GET /{alias}` (also answers `HEAD`)
///
/// # Request Flow
///
/// 1. Look up the live link holding the alias (the only await)
/// 2. Publish a `LinkVisited` event without waiting
/// 3. Return 307 Temporary Redirect
///
/// # Click Tracking
///
/// The click is counted asynchronously by the click worker. A full or
/// closed queue drops the event and the redirect still succeeds. `HEAD`
/// requests are link checks, not visits, and are not counted.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is malformed, unknown or deleted.
pub async fn redirect_handler(
    method: Method,
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve_alias(&alias).await?;

    if method != Method::HEAD {
        state.click_sender.publish(ClickEvent::visited(link.id));
    }

    Ok(Redirect::temporary(&link.url))
}
