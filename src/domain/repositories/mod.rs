//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by concrete
//! repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD and alias lookups
//! - [`StatsRepository`] - Daily click counters and aggregation
//! - [`UserRepository`] - User accounts

pub mod link_repository;
pub mod stats_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
