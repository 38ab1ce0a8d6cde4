//! Handlers for account registration and login.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `POST /auth/register` → `201 {"token": "..."}`.
///
/// Returns 409 if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .auth_service
        .register(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// `POST /auth/login` → `200 {"token": "..."}`.
///
/// Returns 401 on unknown email or wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
