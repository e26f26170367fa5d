//! # Grimoire
//!
//! Spell recipes, timing resolution and spell effects for Clawcaster.
//!
//! The grimoire is the encounter-agnostic half of the spell pipeline:
//!
//! - **Materials**: the three symbolic ingredients and the slots that hold them
//! - **Recipes**: a registry mapping material multisets to spell effects
//! - **Timing**: an oscillating arrow over per-spell timing windows that turns a
//!   button press into a timing accuracy
//! - **Effects**: scales a recipe by timing accuracy and tracks duration effects
//! - **Hints**: recipe hints for the material-selection screen
//!
//! ## Quick Start
//!
//! ```
//! use grimoire::{MaterialKind, SpellDatabase, SpellEffectsSystem};
//!
//! let db = SpellDatabase::standard();
//! let castable = db.available_spells(&[MaterialKind::Fire]);
//! assert!(castable.iter().any(|r| r.id == "ember"));
//!
//! let ember = db.recipe("ember").unwrap();
//! let mut effects = SpellEffectsSystem::new();
//! let result = effects.cast_spell(ember, 1.0);
//! assert_eq!(result.damage, Some(25));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arrow;
pub mod database;
pub mod effects;
pub mod error;
pub mod hints;
pub mod material;
pub mod recipe;
pub mod timing;

// Re-exports for convenience
pub use arrow::{ArrowConfig, SpellArrow};
pub use database::SpellDatabase;
pub use effects::{effect_multiplier, ActiveEffect, SpellCastResult, SpellEffectsSystem};
pub use error::{GrimoireError, Result};
pub use hints::{generate_hints, missing_materials, RecipeHint};
pub use material::{MaterialKind, MaterialSlots};
pub use recipe::{Difficulty, EffectArea, EffectKind, SpellEffect, SpellRecipe};
pub use timing::{timing_windows, TimingQuality, TimingResult, TimingSelector, TimingWindow};
