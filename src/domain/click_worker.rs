//! Single consumer of the click queue.
//!
//! Exactly one worker runs per process, so every `(link_id, date)` counter is
//! updated by one task at a time, in the order events were queued.

use crate::domain::click_event::{ClickEvent, ClickReceiver};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// What the worker did before its queue closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Events persisted.
    pub processed: u64,
    /// Events dropped after retries ran out or on a permanent error.
    pub failed: u64,
}

/// Consumes click events until every sender is dropped and the buffer is empty.
///
/// Each event increments the counter for its link on the UTC day of the visit.
/// Internal store errors are retried with exponential backoff, `retry_attempts`
/// attempts in total; after that the event is logged and dropped. The worker
/// never stops on a failed event.
pub async fn run_click_worker(
    mut receiver: ClickReceiver,
    stats: Arc<dyn StatsRepository>,
    retry_attempts: usize,
) -> WorkerReport {
    let mut report = WorkerReport::default();

    tracing::info!(retry_attempts, "Click worker started");

    while let Some(event) = receiver.recv().await {
        match record(&event, stats.as_ref(), retry_attempts).await {
            Ok(()) => {
                report.processed += 1;
                metrics::counter!("click_events_processed_total").increment(1);
            }
            Err(e) => {
                report.failed += 1;
                metrics::counter!("click_events_failed_total").increment(1);
                tracing::error!(
                    link_id = event.link_id(),
                    error = %e,
                    "Failed to record click, dropping event"
                );
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        failed = report.failed,
        "Click worker stopped"
    );

    report
}

async fn record(
    event: &ClickEvent,
    stats: &dyn StatsRepository,
    retry_attempts: usize,
) -> Result<(), AppError> {
    match event {
        ClickEvent::LinkVisited {
            link_id,
            visited_at,
        } => {
            let date = visited_at.date_naive();

            RetryIf::start(
                backoff(retry_attempts),
                || stats.increment_click(*link_id, date),
                |e: &AppError| {
                    let transient = is_transient(e);
                    if transient {
                        tracing::warn!(link_id = *link_id, error = %e, "Click upsert failed, retrying");
                    }
                    transient
                },
            )
            .await
        }
    }
}

/// Delays between attempts: 50ms, 100ms, 200ms... capped at 1s, with jitter.
fn backoff(retry_attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(25)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(retry_attempts.saturating_sub(1))
}

fn is_transient(e: &AppError) -> bool {
    matches!(e, AppError::Internal { .. })
}
