//! Click events and the queue that carries them from redirects to the worker.
//!
//! The queue is created once at startup with [`click_channel`]. The
//! [`ClickSender`] half is cloned into every request via [`crate::state::AppState`];
//! the [`ClickReceiver`] half is moved into the single
//! [`crate::domain::click_worker::run_click_worker`] task.
//!
//! # Delivery
//!
//! FIFO within the process, at most once. [`ClickSender::publish`] never waits:
//! when the queue is full or closed the event is dropped and logged. Events
//! still buffered when the process stops may be lost (see `server::run`).

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Something that happened to a link and affects its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEvent {
    /// A redirect was served. `visited_at` is taken at emission so that a
    /// backlog crossing midnight is counted on the day of the visit.
    LinkVisited {
        link_id: i64,
        visited_at: DateTime<Utc>,
    },
}

impl ClickEvent {
    /// A visit happening now.
    pub fn visited(link_id: i64) -> Self {
        Self::LinkVisited {
            link_id,
            visited_at: Utc::now(),
        }
    }

    pub fn link_id(&self) -> i64 {
        match self {
            Self::LinkVisited { link_id, .. } => *link_id,
        }
    }
}

/// Result of a non-blocking publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Queued,
    /// Queue at capacity; event discarded.
    DroppedFull,
    /// Consumer gone; event discarded.
    DroppedClosed,
}

/// Queue-wide counters shared by both halves.
#[derive(Debug, Default)]
pub struct ClickCounters {
    published: AtomicU64,
    dropped: AtomicU64,
    received: AtomicU64,
}

impl ClickCounters {
    /// Events accepted into the queue.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Events discarded at publish time.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Events taken off the queue by the consumer.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Events accepted but not yet taken by the consumer.
    pub fn pending(&self) -> u64 {
        self.published().saturating_sub(self.received())
    }
}

/// Producer half of the click queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ClickSender {
    tx: mpsc::Sender<ClickEvent>,
    counters: Arc<ClickCounters>,
}

impl ClickSender {
    /// Enqueues an event without waiting.
    ///
    /// Never fails the caller: a full or closed queue drops the event with a log line.
    pub fn publish(&self, event: ClickEvent) -> PublishOutcome {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.counters.published.fetch_add(1, Ordering::Relaxed);
                PublishOutcome::Queued
            }
            Err(TrySendError::Full(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("click_events_dropped_total", "reason" => "full").increment(1);
                tracing::warn!(
                    link_id = event.link_id(),
                    capacity = self.tx.max_capacity(),
                    "Click queue full, dropping event"
                );
                PublishOutcome::DroppedFull
            }
            Err(TrySendError::Closed(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("click_events_dropped_total", "reason" => "closed").increment(1);
                tracing::error!(
                    link_id = event.link_id(),
                    "Click queue closed, dropping event"
                );
                PublishOutcome::DroppedClosed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots right now.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn counters(&self) -> Arc<ClickCounters> {
        self.counters.clone()
    }
}

/// Consumer half of the click queue. Owned by exactly one task.
#[derive(Debug)]
pub struct ClickReceiver {
    rx: mpsc::Receiver<ClickEvent>,
    counters: Arc<ClickCounters>,
}

impl ClickReceiver {
    /// Waits for the next event; `None` once every sender is gone and the buffer is empty.
    pub async fn recv(&mut self) -> Option<ClickEvent> {
        let event = self.rx.recv().await;
        if event.is_some() {
            self.counters.received.fetch_add(1, Ordering::Relaxed);
        }
        event
    }

    /// Non-blocking receive; used by tests to inspect what a handler emitted.
    pub fn try_recv(&mut self) -> Option<ClickEvent> {
        let event = self.rx.try_recv().ok();
        if event.is_some() {
            self.counters.received.fetch_add(1, Ordering::Relaxed);
        }
        event
    }

    pub fn counters(&self) -> Arc<ClickCounters> {
        self.counters.clone()
    }
}

/// Creates the bounded click queue.
///
/// # Panics
///
/// Panics if `capacity` is 0 (rejected earlier by config validation).
pub fn click_channel(capacity: usize) -> (ClickSender, ClickReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let counters = Arc::new(ClickCounters::default());

    (
        ClickSender {
            tx,
            counters: counters.clone(),
        },
        ClickReceiver { rx, counters },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_is_fifo() {
        let (tx, mut rx) = click_channel(8);

        for id in 1..=3 {
            assert_eq!(tx.publish(ClickEvent::visited(id)), PublishOutcome::Queued);
        }

        assert_eq!(rx.recv().await.unwrap().link_id(), 1);
        assert_eq!(rx.recv().await.unwrap().link_id(), 2);
        assert_eq!(rx.recv().await.unwrap().link_id(), 3);
    }

    #[test]
    fn test_publish_drops_when_full() {
        let (tx, _rx) = click_channel(2);

        assert_eq!(tx.publish(ClickEvent::visited(1)), PublishOutcome::Queued);
        assert_eq!(tx.publish(ClickEvent::visited(1)), PublishOutcome::Queued);
        assert_eq!(tx.publish(ClickEvent::visited(1)), PublishOutcome::DroppedFull);

        let counters = tx.counters();
        assert_eq!(counters.published(), 2);
        assert_eq!(counters.dropped(), 1);
        assert_eq!(counters.pending(), 2);
    }

    #[test]
    fn test_publish_drops_when_closed() {
        let (tx, rx) = click_channel(2);
        drop(rx);

        assert!(tx.is_closed());
        assert_eq!(tx.publish(ClickEvent::visited(7)), PublishOutcome::DroppedClosed);
        assert_eq!(tx.counters().dropped(), 1);
    }

    #[tokio::test]
    async fn test_receiver_ends_after_senders_dropped() {
        let (tx, mut rx) = click_channel(4);
        tx.publish(ClickEvent::visited(5));
        drop(tx);

        assert_eq!(rx.recv().await.map(|e| e.link_id()), Some(5));
        assert_eq!(rx.recv().await, None);
        assert_eq!(rx.counters().pending(), 0);
    }

    #[test]
    fn test_visited_timestamp_is_now() {
        let before = Utc::now();
        let ClickEvent::LinkVisited { link_id, visited_at } = ClickEvent::visited(3);
        let after = Utc::now();

        assert_eq!(link_id, 3);
        assert!(visited_at >= before && visited_at <= after);
    }
}
