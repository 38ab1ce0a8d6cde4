//! Handler for aggregated click statistics.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::stats::{PeriodStatsResponse, StatsParams};
use crate::error::AppError;
use crate::state::AppState;

/// Returns total clicks across all links per day or month.
///
/// # Endpoint
///
/// `GET /stat?from=2025-01-01&to=2025-01-31&by=day` (Bearer token required)
///
/// # Response
///
/// Newest period first; periods without clicks are omitted.
///
/// ```json
/// [
///   { "period": "2025-01-31", "totalClicks": 12 },
///   { "period": "2025-01-30", "totalClicks": 4 }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 for malformed dates, an unknown grouping, or `from` after `to`.
pub async fn stats_handler(
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> Result<Json<Vec<PeriodStatsResponse>>, AppError> {
    let Query(params) = params?;

    let stats = state
        .stats_service
        .get_stats(params.from, params.to, params.by)
        .await?;

    Ok(Json(stats.into_iter().map(PeriodStatsResponse::from).collect()))
}
