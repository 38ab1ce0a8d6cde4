#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::json;
use short_link::application::services::{AuthService, LinkService, StatsService};
use short_link::domain::click_event::{ClickReceiver, click_channel};
use short_link::domain::entities::{PeriodStats, StatsQuery};
use short_link::domain::repositories::StatsRepository;
use short_link::error::AppError;
use short_link::infrastructure::persistence::{PgLinkRepository, PgStatsRepository, PgUserRepository};
use short_link::state::AppState;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_JWT_SECRET: &str = "test-signing-secret-with-32-bytes!!";
pub const TEST_QUEUE_CAPACITY: usize = 100;

pub async fn create_test_link(pool: &PgPool, hash: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (url, hash) VALUES ($1, $2) RETURNING id")
        .bind(url)
        .bind(hash)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_deleted_link(pool: &PgPool, hash: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (url, hash, deleted_at) VALUES ($1, $2, NOW()) RETURNING id",
    )
    .bind(url)
    .bind(hash)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_clicks(pool: &PgPool, link_id: i64, date: NaiveDate, clicks: i64) {
    sqlx::query("INSERT INTO link_stats (link_id, date, clicks) VALUES ($1, $2, $3)")
        .bind(link_id)
        .bind(date)
        .bind(clicks)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn clicks_on(pool: &PgPool, link_id: i64, date: NaiveDate) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM link_stats WHERE link_id = $1 AND date = $2")
        .bind(link_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .unwrap()
        .unwrap_or(0)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds state backed by `pool`. The receiving end of the click queue is
/// returned so tests can inspect or drain events.
pub fn create_test_state(pool: PgPool) -> (AppState, ClickReceiver) {
    create_test_state_with_capacity(pool, TEST_QUEUE_CAPACITY)
}

pub fn create_test_state_with_capacity(pool: PgPool, capacity: usize) -> (AppState, ClickReceiver) {
    let pool = Arc::new(pool);
    let (click_sender, click_receiver) = click_channel(capacity);

    let state = AppState::new(
        LinkService::new(Arc::new(PgLinkRepository::new(pool.clone())), 10),
        StatsService::new(Arc::new(PgStatsRepository::new(pool.clone()))),
        AuthService::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            TEST_JWT_SECRET,
            3600,
        ),
        click_sender,
    );

    (state, click_receiver)
}

/// Full application router, without path normalization.
pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(short_link::routes::router(state)).unwrap()
}

/// Registers a throwaway account and returns its bearer token.
pub async fn auth_token(server: &TestServer) -> String {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": "tester@example.com",
            "password": "correct-horse",
            "name": "Tester"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// In-memory daily counters for exercising the click worker without a database.
#[derive(Default)]
pub struct MemoryStatsRepository {
    counters: Mutex<HashMap<(i64, NaiveDate), i64>>,
}

impl MemoryStatsRepository {
    pub fn total(&self) -> i64 {
        self.counters.lock().unwrap().values().sum()
    }

    pub fn clicks(&self, link_id: i64, date: NaiveDate) -> i64 {
        self.counters
            .lock()
            .unwrap()
            .get(&(link_id, date))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn increment_click(&self, link_id: i64, date: NaiveDate) -> Result<(), AppError> {
        *self
            .counters
            .lock()
            .unwrap()
            .entry((link_id, date))
            .or_insert(0) += 1;
        Ok(())
    }

    async fn aggregate(&self, query: StatsQuery) -> Result<Vec<PeriodStats>, AppError> {
        let mut periods: HashMap<String, i64> = HashMap::new();
        for ((_, date), clicks) in self.counters.lock().unwrap().iter() {
            if *date >= query.from && *date <= query.to {
                *periods.entry(query.by.period_of(*date)).or_insert(0) += clicks;
            }
        }

        let mut stats: Vec<PeriodStats> = periods
            .into_iter()
            .map(|(period, total_clicks)| PeriodStats {
                period,
                total_clicks,
            })
            .collect();
        stats.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(stats)
    }
}
