//! Error types for the grimoire.

use thiserror::Error;

/// Errors surfaced by recipe lookups and recipe construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrimoireError {
    /// No recipe is registered under this id.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Difficulty tiers are 1 through 3.
    #[error("invalid difficulty tier {0} (expected 1..=3)")]
    InvalidDifficulty(u8),
}

/// Result alias for grimoire operations.
pub type Result<T> = std::result::Result<T, GrimoireError>;
