//! Repository trait for daily click counters.

use crate::domain::entities::{PeriodStats, StatsQuery};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for click counting and aggregation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Adds one click to the `(link_id, date)` counter, creating it with 1 if absent.
    ///
    /// Called only by the click worker, which serializes all increments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_click(&self, link_id: i64, date: NaiveDate) -> Result<(), AppError>;

    /// Sums clicks over all links within `query.from..=query.to`, grouped by
    /// day or month, newest period first.
    async fn aggregate(&self, query: StatsQuery) -> Result<Vec<PeriodStats>, AppError>;
}
