//! Spell recipe definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GrimoireError;
use crate::material::MaterialKind;

/// Recipe difficulty tier. Controls the timing window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    /// Tier 1, single-material spells.
    Easy = 1,
    /// Tier 2, two-material spells.
    Medium = 2,
    /// Tier 3, three-material spells.
    Hard = 3,
}

impl Difficulty {
    /// Numeric tier.
    #[must_use]
    pub const fn tier(self) -> u8 {
        self as u8
    }

    /// Timing window size in pixels. Larger is easier.
    #[must_use]
    pub const fn timing_window_size(self) -> u32 {
        match self {
            Self::Easy => 60,
            Self::Medium => 40,
            Self::Hard => 25,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = GrimoireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Hard),
            other => Err(GrimoireError::InvalidDifficulty(other)),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.tier()
    }
}

/// What a spell does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Reduces enemy health.
    Damage,
    /// Restores player health.
    Healing,
    /// Non-combat effect (e.g. gathering materials).
    Utility,
    /// Protective effect.
    Defensive,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage => write!(f, "damage"),
            Self::Healing => write!(f, "healing"),
            Self::Utility => write!(f, "utility"),
            Self::Defensive => write!(f, "defensive"),
        }
    }
}

/// Area an effect covers. Carried as data, the encounter core only has one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectArea {
    /// One target.
    #[default]
    Single,
    /// A small group.
    Small,
    /// Everything in range.
    Large,
}

/// The effect payload of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEffect {
    /// Effect kind.
    pub kind: EffectKind,
    /// Base value before timing scaling.
    pub value: u32,
    /// Number of turns the effect lingers, if any.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Area of effect.
    #[serde(default)]
    pub area: EffectArea,
    /// Flat defense granted in addition to the main effect.
    #[serde(default)]
    pub defense: Option<u32>,
    /// Human-readable summary, e.g. "25 damage".
    pub description: String,
}

impl SpellEffect {
    /// Creates an effect with no duration, single-target area and no defense bonus.
    #[must_use]
    pub fn new(kind: EffectKind, value: u32, description: &str) -> Self {
        Self {
            kind,
            value,
            duration: None,
            area: EffectArea::Single,
            defense: None,
            description: description.to_string(),
        }
    }

    /// Sets the lingering duration in turns.
    #[must_use]
    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    /// Sets the area of effect.
    #[must_use]
    pub fn with_area(mut self, area: EffectArea) -> Self {
        self.area = area;
        self
    }

    /// Sets the flat defense bonus.
    #[must_use]
    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = Some(defense);
        self
    }
}

/// A spell recipe: a material multiset mapped to an effect.
///
/// Recipes are immutable after registration except for the `discovered` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRecipe {
    /// Registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor description.
    pub description: String,
    /// Required materials. Order is irrelevant, duplicates count.
    pub materials: Vec<MaterialKind>,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Whether the recipe is visible to the player.
    pub discovered: bool,
    /// What the spell does.
    pub effect: SpellEffect,
}

impl SpellRecipe {
    /// Number of materials the recipe consumes.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// True for the zero-cost utility spell.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.materials.is_empty()
    }
}
