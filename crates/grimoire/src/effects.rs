//! Spell casting and duration-based effects.
//!
//! Casting scales a recipe's base value by an effectiveness multiplier derived
//! from timing accuracy:
//!
//! ```text
//! multiplier = 0.7 + 0.3 * clamp(accuracy, 0, 1)
//! ```
//!
//! so a perfectly timed spell lands at full strength and a miss still lands at
//! 70%. Recipes with a duration also spawn an [`ActiveEffect`] that counts down
//! once per combat turn.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::recipe::{EffectArea, EffectKind, SpellRecipe};

/// Floor of the effectiveness multiplier.
pub const MIN_EFFECTIVENESS: f64 = 0.7;

/// Distinct two-material recipes that must be cast to unlock the third slot.
pub const THIRD_SLOT_UNLOCK_CASTS: usize = 3;

/// Effectiveness multiplier for a timing accuracy, in `[0.7, 1.0]`.
///
/// NaN accuracy counts as a complete miss.
#[must_use]
pub fn effect_multiplier(timing_accuracy: f64) -> f64 {
    let accuracy = if timing_accuracy.is_nan() {
        0.0
    } else {
        timing_accuracy.clamp(0.0, 1.0)
    };
    MIN_EFFECTIVENESS + accuracy * (1.0 - MIN_EFFECTIVENESS)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(value: u32, multiplier: f64) -> u32 {
    (f64::from(value) * multiplier).round() as u32
}

/// A time-limited consequence of a duration-bearing spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Unique id, `effect_<n>`.
    pub id: String,
    /// Name of the spell that spawned it.
    pub name: String,
    /// Effect kind.
    pub kind: EffectKind,
    /// Value after timing scaling.
    pub value: u32,
    /// Total duration in turns.
    pub duration: u32,
    /// Turns left before expiry.
    pub remaining_turns: u32,
    /// Area of effect.
    pub area: EffectArea,
    /// Multiplier applied at cast time.
    pub effect_multiplier: f64,
    /// Recipe effect description.
    pub description: String,
}

/// Outcome of casting a spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellCastResult {
    /// Id of the cast recipe.
    pub recipe_id: String,
    /// Display name of the cast recipe.
    pub recipe_name: String,
    /// Effectiveness multiplier applied.
    pub effectiveness: f64,
    /// Scaled damage, for damage spells.
    pub damage: Option<u32>,
    /// Scaled healing, for healing spells.
    pub healing: Option<u32>,
    /// Flat defense bonus declared by the recipe.
    pub defense: Option<u32>,
    /// Duration effect spawned by this cast, if any.
    pub effects: Vec<ActiveEffect>,
    /// Human-readable summary.
    pub message: String,
    /// True on the one cast that unlocked the third material slot.
    pub slot_unlocked: bool,
}

impl SpellCastResult {
    /// Damage dealt, zero if none.
    #[must_use]
    pub fn damage_amount(&self) -> u32 {
        self.damage.unwrap_or(0)
    }

    /// Healing done, zero if none.
    #[must_use]
    pub fn healing_amount(&self) -> u32 {
        self.healing.unwrap_or(0)
    }

    /// Defense granted, zero if none.
    #[must_use]
    pub fn defense_amount(&self) -> u32 {
        self.defense.unwrap_or(0)
    }
}

/// Resolves casts and owns the live list of duration effects.
///
/// # Example
///
/// ```
/// use grimoire::{SpellDatabase, SpellEffectsSystem};
///
/// let db = SpellDatabase::standard();
/// let mut system = SpellEffectsSystem::new();
///
/// let result = system.cast_spell(db.recipe("molten_shard").unwrap(), 0.5);
/// assert_eq!(result.effects.len(), 1);
/// assert_eq!(system.active_effects()[0].remaining_turns, 2);
///
/// system.update_effects();
/// system.update_effects();
/// assert!(system.active_effects().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpellEffectsSystem {
    active_effects: Vec<ActiveEffect>,
    next_effect_id: u64,
    two_material_recipes: BTreeSet<String>,
    third_slot_unlocked: bool,
}

impl SpellEffectsSystem {
    /// Creates a system with no active effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Casts `recipe` with the given timing accuracy.
    pub fn cast_spell(&mut self, recipe: &SpellRecipe, timing_accuracy: f64) -> SpellCastResult {
        let multiplier = effect_multiplier(timing_accuracy);
        let effect = &recipe.effect;

        let mut result = SpellCastResult {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            effectiveness: multiplier,
            damage: None,
            healing: None,
            defense: effect.defense,
            effects: Vec::new(),
            message: String::new(),
            slot_unlocked: false,
        };

        result.message = match effect.kind {
            EffectKind::Damage => {
                let damage = scale(effect.value, multiplier);
                result.damage = Some(damage);
                format!("{} deals {damage} damage", recipe.name)
            }
            EffectKind::Healing => {
                let healing = scale(effect.value, multiplier);
                result.healing = Some(healing);
                format!("{} heals {healing} health", recipe.name)
            }
            EffectKind::Utility => format!("{} activated", recipe.name),
            EffectKind::Defensive => format!("{} provides protection", recipe.name),
        };

        if let Some(duration) = effect.duration.filter(|&turns| turns > 0) {
            let active = ActiveEffect {
                id: format!("effect_{}", self.next_effect_id),
                name: recipe.name.clone(),
                kind: effect.kind,
                value: scale(effect.value, multiplier),
                duration,
                remaining_turns: duration,
                area: effect.area,
                effect_multiplier: multiplier,
                description: effect.description.clone(),
            };
            self.next_effect_id += 1;
            self.active_effects.push(active.clone());
            result.effects.push(active);
        }

        if recipe.material_count() == 2 {
            self.two_material_recipes.insert(recipe.id.clone());
            let cast = self.two_material_recipes.len();
            result.message +=
                &format!(" (2-material spells cast: {cast}/{THIRD_SLOT_UNLOCK_CASTS})");

            if cast >= THIRD_SLOT_UNLOCK_CASTS && !self.third_slot_unlocked {
                self.third_slot_unlocked = true;
                result.slot_unlocked = true;
                tracing::info!(casts = cast, "third material slot unlock earned");
            }
        }

        tracing::debug!(
            spell = %recipe.id,
            effectiveness = multiplier,
            damage = ?result.damage,
            healing = ?result.healing,
            "spell cast"
        );

        result
    }

    /// Ticks every active effect by one turn and drops the expired ones.
    ///
    /// Call once per combat turn, not once per frame.
    pub fn update_effects(&mut self) {
        self.active_effects.retain_mut(|effect| {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                tracing::debug!(effect = %effect.name, "effect expired");
                return false;
            }
            true
        });
    }

    /// Live duration effects.
    #[must_use]
    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }

    /// Drops every active effect.
    pub fn clear_all_effects(&mut self) {
        self.active_effects.clear();
    }

    /// Number of distinct two-material recipes cast so far.
    #[must_use]
    pub fn two_material_casts(&self) -> usize {
        self.two_material_recipes.len()
    }

    /// Whether the third-slot unlock has been earned.
    #[must_use]
    pub fn third_slot_unlocked(&self) -> bool {
        self.third_slot_unlocked
    }
}
