//! Gameplay tuning configuration.
//!
//! Every field has a default matching the shipped tuning, and missing JSON
//! fields fall back to those defaults, so a config file only needs to name
//! what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use grimoire::ArrowConfig;

use crate::error::ConfigError;

/// Combat pacing and enemy AI tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Real-time delay of the enemy turn and of the waiting phase, in ms.
    pub turn_delay_ms: f64,
    /// Player maximum health.
    pub player_max_health: u32,
    /// Heavy attack damage relative to base damage.
    pub heavy_attack_multiplier: f64,
    /// Health fraction below which the enemy favors defensive actions.
    pub wounded_threshold: f64,
    /// Weight added to BLOCK and PARRY while wounded.
    pub wounded_defense_bonus: f64,
    /// Turns before HEAVY_ATTACK can be used again.
    pub heavy_attack_cooldown: u32,
    /// Turns before BLOCK can be used again.
    pub block_cooldown: u32,
    /// Turns before PARRY can be used again.
    pub parry_cooldown: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            turn_delay_ms: 1000.0,
            player_max_health: 100,
            heavy_attack_multiplier: 1.5,
            wounded_threshold: 0.3,
            wounded_defense_bonus: 20.0,
            heavy_attack_cooldown: 2,
            block_cooldown: 1,
            parry_cooldown: 2,
        }
    }
}

/// Confirm-button buffering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How long a buffered press stays consumable, in ms.
    pub buffer_ms: u64,
    /// Window after the last press reported by `is_within_timing_window`, in ms.
    pub timing_window_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            buffer_ms: 100,
            timing_window_ms: 500,
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```
/// use clawcaster_core::GameConfig;
///
/// let json = r#"{ "seed": 7, "combat": { "turn_delay_ms": 250.0 } }"#;
/// let config = GameConfig::from_json_str(json)?;
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.combat.turn_delay_ms, 250.0);
/// assert_eq!(config.combat.player_max_health, 100);
/// # Ok::<(), clawcaster_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Master seed for every random draw.
    pub seed: u64,
    /// Combat tuning.
    pub combat: CombatConfig,
    /// Spell arrow layout and speed.
    pub arrow: ArrowConfig,
    /// Input buffering.
    pub input: InputConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            combat: CombatConfig::default(),
            arrow: ArrowConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default config with a different seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Parses a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid for the schema.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), seed = config.seed, "loaded game config");
        Ok(config)
    }
}
