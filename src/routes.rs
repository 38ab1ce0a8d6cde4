//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{alias}`   - Short link redirect (public)
//! - `GET  /health`    - Health check: DB, click queue (public)
//! - `/link`, `/auth/*` - Public API
//! - `/link/{id}`, `/stat` - API behind Bearer token
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - JWT Bearer token on protected routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with state and tracing applied, without path normalization.
///
/// Normalization has to wrap the router from outside, so it is applied only
/// in [`app_router`].
pub fn router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/{alias}", get(redirect_handler))
        .merge(api::routes::public_routes())
        .merge(protected)
        .with_state(state)
        .layer(tracing::layer())
}
