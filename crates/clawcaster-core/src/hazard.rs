//! Puzzle hazards and difficulty-scaled puzzle generation.
//!
//! A puzzle is a single numeric target to reach within a time limit. Both are
//! derived from a hazard archetype:
//!
//! ```text
//! adjusted = max(1, difficulty - base_difficulty + 1)
//! target   = clamp(round(min_target * target_multiplier^(adjusted - 1)), min_target, max_target)
//! time     = clamp(round(max_time   * time_multiplier^(adjusted - 1)),   min_time,   max_time)
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enemy::{EnemyData, EnemyDifficulty};
use crate::encounter::EncounterType;

/// What a puzzle counts toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleType {
    /// Spell damage counts.
    Damage,
    /// Spell defense counts.
    Blocking,
}

impl fmt::Display for PuzzleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage => f.write_str("damage"),
            Self::Blocking => f.write_str("blocking"),
        }
    }
}

/// Scaling parameters of a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuzzleScaling {
    /// Target growth per difficulty step.
    pub target_multiplier: f64,
    /// Time shrink per difficulty step.
    pub time_multiplier: f64,
    /// Lower bound of the time limit, seconds.
    pub min_time: u32,
    /// Upper bound of the time limit and its starting value, seconds.
    pub max_time: u32,
    /// Lower bound of the target and its starting value.
    pub min_target: u32,
    /// Upper bound of the target.
    pub max_target: u32,
}

impl PuzzleScaling {
    /// Scaling over the shipped 90 to 120 second time range.
    #[must_use]
    pub const fn standard(
        target_multiplier: f64,
        time_multiplier: f64,
        min_target: u32,
        max_target: u32,
    ) -> Self {
        Self {
            target_multiplier,
            time_multiplier,
            min_time: 90,
            max_time: 120,
            min_target,
            max_target,
        }
    }
}

/// A puzzle archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleHazard {
    /// Table key.
    pub id: String,
    /// What counts toward the target.
    pub kind: PuzzleType,
    /// Name shown to the player.
    pub display_name: String,
    /// Flavor text.
    pub description: String,
    /// Opaque sprite key passed through to the presenter.
    pub asset_key: String,
    /// Difficulty level at which scaling starts.
    pub base_difficulty: u32,
    /// Scaling parameters.
    pub scaling: PuzzleScaling,
}

/// Sprite scale used when a hazard is shown in the enemy slot.
const HAZARD_DISPLAY_SCALE: f32 = 0.4;

impl PuzzleHazard {
    /// Presents the hazard through the enemy display, with `target` as its
    /// health bar.
    #[must_use]
    pub fn as_enemy_display(&self, target: u32) -> EnemyData {
        EnemyData::new(&self.id, &self.display_name, target, 0, EnemyDifficulty::Easy)
            .with_sprite(&self.asset_key, HAZARD_DISPLAY_SCALE)
            .with_description(&self.description)
            .appearing_in(&[EncounterType::Puzzle])
    }
}

/// A generated puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// The hazard archetype.
    pub hazard: PuzzleHazard,
    /// Amount of damage or blocking required.
    pub target: u32,
    /// Time limit in seconds.
    pub time_limit: u32,
    /// Difficulty level the puzzle was generated for.
    pub difficulty_level: u32,
}

/// Table of hazard archetypes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardTable {
    hazards: Vec<PuzzleHazard>,
}

impl HazardTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped hazards.
    #[must_use]
    pub fn standard() -> Self {
        use PuzzleType::{Blocking, Damage};

        Self {
            hazards: vec![
                PuzzleHazard {
                    id: "thorn_bush".into(),
                    kind: Damage,
                    display_name: "Thorn Bush".into(),
                    description: "A dangerous thorn bush blocking your path".into(),
                    asset_key: "wiz_enemy_crane".into(),
                    base_difficulty: 1,
                    scaling: PuzzleScaling::standard(1.3, 0.9, 80, 300),
                },
                PuzzleHazard {
                    id: "falling_rocks".into(),
                    kind: Blocking,
                    display_name: "Falling Rocks".into(),
                    description: "Rocks are falling from above - block the damage!".into(),
                    asset_key: "wiz_enemy_lizard".into(),
                    base_difficulty: 1,
                    scaling: PuzzleScaling::standard(1.2, 0.8, 50, 200),
                },
                PuzzleHazard {
                    id: "fire_trap".into(),
                    kind: Damage,
                    display_name: "Fire Trap".into(),
                    description: "A magical fire trap must be extinguished".into(),
                    asset_key: "wiz_enemy_fox".into(),
                    base_difficulty: 2,
                    scaling: PuzzleScaling::standard(1.4, 0.8, 80, 400),
                },
                PuzzleHazard {
                    id: "ice_barrier".into(),
                    kind: Blocking,
                    display_name: "Ice Barrier".into(),
                    description: "An ice barrier is sending freezing attacks".into(),
                    asset_key: "wiz_enemy_crane".into(),
                    base_difficulty: 2,
                    scaling: PuzzleScaling::standard(1.2, 0.8, 50, 200),
                },
            ],
        }
    }

    /// Adds a hazard, replacing any entry with the same id.
    pub fn insert(&mut self, hazard: PuzzleHazard) {
        match self.hazards.iter_mut().find(|h| h.id == hazard.id) {
            Some(slot) => *slot = hazard,
            None => self.hazards.push(hazard),
        }
    }

    /// Looks up a hazard by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PuzzleHazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    /// All hazards.
    #[must_use]
    pub fn all(&self) -> &[PuzzleHazard] {
        &self.hazards
    }

    /// Hazards of the given type.
    #[must_use]
    pub fn by_type(&self, kind: PuzzleType) -> Vec<&PuzzleHazard> {
        self.hazards.iter().filter(|h| h.kind == kind).collect()
    }
}

/// Builds [`PuzzleConfig`]s from a [`HazardTable`].
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    /// Picks a hazard uniformly (restricted to `forced` if given) and scales
    /// it to `difficulty_level`.
    ///
    /// Returns `None` if no hazard qualifies.
    ///
    /// # Example
    ///
    /// ```
    /// use clawcaster_core::{HazardTable, PuzzleGenerator, PuzzleType};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let table = HazardTable::standard();
    /// let mut rng = ChaCha8Rng::seed_from_u64(1);
    /// let puzzle =
    ///     PuzzleGenerator::generate(&table, 1, Some(PuzzleType::Damage), &mut rng).unwrap();
    /// assert_eq!(puzzle.hazard.kind, PuzzleType::Damage);
    /// assert!(puzzle.target >= 80);
    /// ```
    pub fn generate<R: Rng + ?Sized>(
        table: &HazardTable,
        difficulty_level: u32,
        forced: Option<PuzzleType>,
        rng: &mut R,
    ) -> Option<PuzzleConfig> {
        let candidates: Vec<&PuzzleHazard> = match forced {
            Some(kind) => table.by_type(kind),
            None => table.all().iter().collect(),
        };
        let hazard = candidates.choose(rng)?;
        Some(Self::scale(hazard, difficulty_level))
    }

    /// Scales a specific hazard to `difficulty_level`.
    #[must_use]
    pub fn scale(hazard: &PuzzleHazard, difficulty_level: u32) -> PuzzleConfig {
        let scaling = &hazard.scaling;
        let adjusted = (i64::from(difficulty_level) - i64::from(hazard.base_difficulty) + 1).max(1);
        let steps = i32::try_from(adjusted - 1).unwrap_or(i32::MAX);

        let target = scaled(scaling.min_target, scaling.target_multiplier, steps)
            .clamp(scaling.min_target, scaling.max_target);
        let time_limit = scaled(scaling.max_time, scaling.time_multiplier, steps)
            .clamp(scaling.min_time, scaling.max_time);

        PuzzleConfig {
            hazard: hazard.clone(),
            target,
            time_limit,
            difficulty_level,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(base: u32, multiplier: f64, steps: i32) -> u32 {
    let value = (f64::from(base) * multiplier.powi(steps)).round();
    // saturate instead of wrapping for very high levels
    value.min(f64::from(u32::MAX)) as u32
}
