//! Click statistics service.

use std::sync::Arc;

use crate::domain::entities::{PeriodStats, StatsGrouping, StatsQuery};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use chrono::NaiveDate;
use serde_json::json;

/// Read side of click statistics.
///
/// Writes go through the click worker only; this service answers aggregate
/// queries over the daily counters.
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    /// Total clicks across all links per day or month, newest period first.
    ///
    /// Periods without clicks are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to`.
    pub async fn get_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        by: StatsGrouping,
    ) -> Result<Vec<PeriodStats>, AppError> {
        if from > to {
            return Err(AppError::bad_request(
                "Invalid date range",
                json!({ "from": from, "to": to, "reason": "from must not be after to" }),
            ));
        }

        self.stats.aggregate(StatsQuery { from, to, by }).await
    }
}
