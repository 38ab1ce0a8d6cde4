//! Helpers shared across layers.
//!
//! - [`alias`] - Short alias generation and collision resolution
//! - [`target_url`] - Redirect target validation

pub mod alias;
pub mod target_url;
