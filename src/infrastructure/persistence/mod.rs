//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Links and alias lookups
//! - [`PgStatsRepository`] - Daily click counters and aggregation
//! - [`PgUserRepository`] - User accounts

pub mod pg_link_repository;
pub mod pg_stats_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
pub use pg_user_repository::PgUserRepository;
