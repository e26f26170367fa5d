//! Cross-module tests for encounter sequencing.
//!
//! - `determinism.rs`: same seed, same inputs, same outcome
//! - `integration.rs`: full runs through the manager with a recording presenter
//! - `helpers.rs`: presenter double, tracing setup and frame drivers

mod helpers;

// Re-export for convenience
pub use helpers::*;
