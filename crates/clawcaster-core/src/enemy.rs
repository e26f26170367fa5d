//! Enemy stat blocks and the registry that serves them.
//!
//! The registry is an immutable table built once at startup and shared by
//! reference with whoever constructs encounters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encounter::EncounterType;

/// Enemy difficulty tier.
///
/// Besides flavor, the tier sets how often the enemy's intent hint can be
/// trusted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyDifficulty {
    /// Hints are certain 80% of the time.
    Easy,
    /// Hints are certain 60% of the time.
    Medium,
    /// Hints are certain 40% of the time.
    Hard,
}

impl EnemyDifficulty {
    /// Probability that the intent hint passes the certainty gate.
    #[must_use]
    pub fn hint_certainty(self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 0.6,
            Self::Hard => 0.4,
        }
    }
}

impl fmt::Display for EnemyDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// Immutable enemy stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyData {
    /// Registry key.
    pub id: String,
    /// Internal name.
    pub name: String,
    /// Name shown to the player.
    pub display_name: String,
    /// Starting and maximum health.
    pub max_health: u32,
    /// Damage of a regular attack.
    pub damage: u32,
    /// Opaque sprite key passed through to the presenter.
    pub asset_key: String,
    /// Opaque sprite scale passed through to the presenter.
    pub scale: f32,
    /// Flavor text.
    pub description: String,
    /// Difficulty tier.
    pub difficulty: EnemyDifficulty,
    /// Encounter types this enemy appears in.
    pub encounter_types: Vec<EncounterType>,
}

impl EnemyData {
    /// Creates a stat block with no sprite, no flavor text, and no
    /// encounter types.
    #[must_use]
    pub fn new(
        id: &str,
        display_name: &str,
        max_health: u32,
        damage: u32,
        difficulty: EnemyDifficulty,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            display_name: display_name.to_string(),
            max_health,
            damage,
            asset_key: String::new(),
            scale: 1.0,
            description: String::new(),
            difficulty,
            encounter_types: Vec::new(),
        }
    }

    /// Sets the sprite key and scale.
    #[must_use]
    pub fn with_sprite(mut self, asset_key: &str, scale: f32) -> Self {
        self.asset_key = asset_key.to_string();
        self.scale = scale;
        self
    }

    /// Sets the flavor text.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the encounter types the enemy appears in.
    #[must_use]
    pub fn appearing_in(mut self, kinds: &[EncounterType]) -> Self {
        self.encounter_types = kinds.to_vec();
        self
    }

    /// Whether the enemy can appear in encounters of `kind`.
    #[must_use]
    pub fn appears_in(&self, kind: EncounterType) -> bool {
        self.encounter_types.contains(&kind)
    }
}

/// Lookup table of enemies, in registration order.
///
/// # Example
///
/// ```
/// use clawcaster_core::{EnemyDifficulty, EnemyRegistry};
///
/// let registry = EnemyRegistry::standard();
/// let lizard = registry.get("lizard").unwrap();
/// assert_eq!(lizard.max_health, 100);
/// assert_eq!(registry.by_difficulty(EnemyDifficulty::Hard).len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyRegistry {
    enemies: Vec<EnemyData>,
}

impl EnemyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped bestiary.
    #[must_use]
    pub fn standard() -> Self {
        use EncounterType::{Combat, PreyHunt, Trap};
        use EnemyDifficulty::{Easy, Hard, Medium};

        let mut registry = Self::new();
        for data in [
            EnemyData::new("lizard", "Swamp Lizard", 100, 15, Easy)
                .with_sprite("battle_lizard", 0.35)
                .with_description("A fierce lizard from the swamplands")
                .appearing_in(&[Combat]),
            EnemyData::new("fox", "Cunning Fox", 80, 12, Easy)
                .with_sprite("battle_fox", 0.4)
                .with_description("A clever fox that uses tricks in battle")
                .appearing_in(&[Combat, PreyHunt]),
            EnemyData::new("crane", "Sky Crane", 120, 20, Medium)
                .with_sprite("battle_crane", 0.45)
                .with_description("A majestic crane with wind magic")
                .appearing_in(&[Combat]),
            EnemyData::new("shadow_wolf", "Shadow Wolf", 150, 25, Hard)
                .with_sprite("enemy_shadow_wolf", 0.5)
                .with_description("A wolf wreathed in dark magic")
                .appearing_in(&[Combat]),
            EnemyData::new("crystal_spider", "Crystal Spider", 60, 10, Easy)
                .with_sprite("enemy_crystal_spider", 0.3)
                .with_description("A spider made of living crystal")
                .appearing_in(&[Combat, Trap]),
        ] {
            registry.insert(data);
        }
        registry
    }

    /// Adds an enemy, replacing any entry with the same id.
    pub fn insert(&mut self, data: EnemyData) {
        match self.enemies.iter_mut().find(|e| e.id == data.id) {
            Some(slot) => *slot = data,
            None => self.enemies.push(data),
        }
    }

    /// Looks up an enemy by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EnemyData> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// All enemies.
    #[must_use]
    pub fn all(&self) -> &[EnemyData] {
        &self.enemies
    }

    /// Enemies of the given tier.
    #[must_use]
    pub fn by_difficulty(&self, difficulty: EnemyDifficulty) -> Vec<&EnemyData> {
        self.enemies
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .collect()
    }

    /// Enemies that appear in encounters of `kind`.
    #[must_use]
    pub fn for_encounter_type(&self, kind: EncounterType) -> Vec<&EnemyData> {
        self.enemies.iter().filter(|e| e.appears_in(kind)).collect()
    }

    /// Number of enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
