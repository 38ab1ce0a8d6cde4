//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers and the admin CLI a single API to call.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Alias allocation, resolution and link management
//! - [`services::stats_service::StatsService`] - Aggregated click statistics
//! - [`services::auth_service::AuthService`] - Registration, login and JWT verification

pub mod services;
