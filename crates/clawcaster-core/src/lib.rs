//! # Clawcaster Core
//!
//! Encounter and turn-based combat core for Clawcaster.
//!
//! This crate sequences encounters and runs their state machines. Rendering,
//! physics and scene plumbing belong to the host, which talks to the core
//! through the [`Presenter`] trait and drives it once per frame.
//!
//! ## Architecture
//!
//! - **Encounters**: a shared SETUP → ACTION → RESOLUTION → COMPLETE lifecycle
//!   ([`encounter::Encounter`]) over per-kind behaviors (combat, puzzle)
//! - **Enemy AI**: weighted-random action choice with cooldowns and an
//!   unreliable intent hint
//! - **Manager**: queues encounter plans, owns the active encounter and holds
//!   it until the player dismisses the result
//!
//! All waiting is polled: every timer is accumulated frame delta checked
//! against a threshold inside `update`.
//!
//! ## Usage
//!
//! ```
//! use clawcaster_core::{EncounterManager, GameConfig, NullPresenter};
//!
//! let mut presenter = NullPresenter;
//! let mut manager = EncounterManager::with_default_queue(GameConfig::default());
//! manager.start_next_encounter(&mut presenter)?;
//! assert!(manager.is_encounter_active());
//!
//! manager.update(16.0, 16.0, &mut presenter);
//! # Ok::<(), clawcaster_core::EncounterError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the grimoire for spell types
pub use grimoire;

pub mod ai;
pub mod caster;
pub mod config;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod hazard;
pub mod input;
pub mod manager;
pub mod presenter;

pub use ai::{EnemyAction, EnemyStance};
pub use caster::{SelectedSpell, SpellCaster};
pub use config::{CombatConfig, GameConfig, InputConfig};
pub use encounter::combat::{CombatEncounter, CombatPhase};
pub use encounter::puzzle::PuzzleEncounter;
pub use encounter::{
    Encounter, EncounterBehavior, EncounterKind, EncounterResult, EncounterState, EncounterType,
};
pub use enemy::{EnemyData, EnemyDifficulty, EnemyRegistry};
pub use error::{ConfigError, EncounterError, Result};
pub use hazard::{HazardTable, PuzzleConfig, PuzzleGenerator, PuzzleHazard, PuzzleType};
pub use input::{InputBuffer, InputEvent, InputKind};
pub use manager::{EncounterConfig, EncounterManager};
pub use presenter::{NullPresenter, Presenter};

#[cfg(test)]
mod tests;
