//! Error types raised by encounter construction and configuration loading.

use thiserror::Error;

use crate::encounter::EncounterType;
use crate::hazard::PuzzleType;

/// Errors raised while building an encounter.
///
/// Construction is the only fallible step of an encounter's life; everything
/// after `start` degrades to a logged no-op instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    /// The enemy registry has no entry for this id.
    #[error("enemy not found: {0}")]
    UnknownEnemy(String),

    /// A combat plan did not name an enemy.
    #[error("combat encounter requires an enemy id")]
    MissingEnemyId,

    /// The hazard table has no hazard of the requested type (or none at all).
    #[error("no puzzle hazard available (requested type: {0:?})")]
    NoHazard(Option<PuzzleType>),

    /// The encounter type has no implementation.
    #[error("{0} encounters are not implemented")]
    Unsupported(EncounterType),
}

/// Result alias for encounter operations.
pub type Result<T> = std::result::Result<T, EncounterError>;

/// Errors raised while loading a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config text is not valid JSON for the schema.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
