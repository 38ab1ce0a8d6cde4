//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the click pipeline, independent
//! of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click events and the bounded queue carrying them
//! - [`click_worker`] - Single consumer persisting click counts
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves the alias
//! 2. [`click_event::ClickEvent::LinkVisited`] is published with `try_send`
//! 3. [`click_worker::run_click_worker`] takes events in FIFO order, with retry
//! 4. The daily counter is upserted via [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
