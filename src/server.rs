//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, worker spawning, and the Axum server lifecycle
//! including graceful shutdown.

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::config::Config;
use crate::domain::click_event::click_channel;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::StatsRepository;
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Click queue and its single worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections and finishes
/// in-flight requests. The click worker then gets
/// `click_drain_timeout_seconds` to empty the queue; events still queued after
/// that are lost and their count is logged.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let stats_repository: Arc<dyn StatsRepository> = Arc::new(PgStatsRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));

    let (click_sender, click_receiver) = click_channel(config.click_queue_capacity);
    let counters = click_sender.counters();

    let worker = tokio::spawn(run_click_worker(
        click_receiver,
        stats_repository.clone(),
        config.click_retry_attempts,
    ));

    let state = AppState::new(
        LinkService::new(link_repository, config.alias_max_attempts),
        StatsService::new(stats_repository),
        AuthService::new(user_repository, &config.jwt_secret, config.jwt_ttl_seconds),
        click_sender,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    // The router owns the last ClickSender; it is dropped when serve returns,
    // which lets the worker see the end of the queue.
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!(pending = counters.pending(), "HTTP server stopped, draining click queue");

    let drain_timeout = Duration::from_secs(config.click_drain_timeout_seconds);
    match tokio::time::timeout(drain_timeout, worker).await {
        Ok(Ok(report)) => {
            tracing::info!(
                processed = report.processed,
                failed = report.failed,
                dropped_at_publish = counters.dropped(),
                "Click queue drained"
            );
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Click worker panicked");
        }
        Err(_) => {
            tracing::warn!(
                lost = counters.pending(),
                timeout_secs = config.click_drain_timeout_seconds,
                "Click queue drain timed out, remaining events lost"
            );
        }
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
