//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{PeriodStats, StatsQuery};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct PeriodRow {
    period: String,
    total_clicks: i64,
}

/// PostgreSQL repository for daily click counters.
///
/// One row per `(link_id, date)` in `link_stats`. Aggregates include clicks
/// of links deleted after they were visited.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment_click(&self, link_id: i64, date: NaiveDate) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO link_stats (link_id, date, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (link_id, date)
            DO UPDATE SET clicks = link_stats.clicks + 1
            "#,
        )
        .bind(link_id)
        .bind(date)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn aggregate(&self, query: StatsQuery) -> Result<Vec<PeriodStats>, AppError> {
        let rows = sqlx::query_as::<_, PeriodRow>(
            r#"
            SELECT to_char(date::timestamp, $3) AS period, SUM(clicks)::BIGINT AS total_clicks
            FROM link_stats
            WHERE date BETWEEN $1 AND $2
            GROUP BY period
            ORDER BY period DESC
            "#,
        )
        .bind(query.from)
        .bind(query.to)
        .bind(query.by.pg_format())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PeriodStats {
                period: r.period,
                total_clicks: r.total_clicks,
            })
            .collect())
    }
}
