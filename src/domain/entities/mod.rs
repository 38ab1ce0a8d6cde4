//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence concerns.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping
//! - [`StatsQuery`] / [`PeriodStats`] - Aggregated click statistics
//! - [`User`] - An account that can obtain a bearer token
//!
//! Creation inputs use separate structs (`NewLink`, `NewUser`).

pub mod click_stat;
pub mod link;
pub mod user;

pub use click_stat::{PeriodStats, StatsGrouping, StatsQuery};
pub use link::{Link, NewLink};
pub use user::{NewUser, User};
