//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, login_handler,
    register_handler, stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Routes open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /link`           - Create a short link
/// - `GET  /link`           - List live links (`limit`, `offset`)
/// - `POST /auth/register`  - Register and receive a token
/// - `POST /auth/login`     - Log in and receive a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/link", get(list_links_handler).post(create_link_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// Routes requiring a Bearer token. Wrap with [`crate::api::middleware::auth::layer`].
///
/// # Endpoints
///
/// - `PATCH  /link/{id}` - Change a link's target URL
/// - `DELETE /link/{id}` - Soft-delete a link
/// - `GET    /stat`      - Aggregated click statistics
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/link/{id}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route("/stat", get(stats_handler))
}
