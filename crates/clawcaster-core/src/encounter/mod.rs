//! Encounter lifecycle.
//!
//! Every encounter walks the same linear state machine:
//!
//! ```text
//! SETUP --start--> ACTION --victory/defeat--> RESOLUTION --complete--> COMPLETE
//! ```
//!
//! [`Encounter`] owns the state and result and drives an
//! [`EncounterBehavior`], which supplies the per-kind hooks. The manager
//! works with [`EncounterKind`], the closed set of implemented behaviors.
//!
//! # Invariants
//!
//! - `update` runs only while in ACTION
//! - Victory is checked before defeat, and the first condition observed wins
//! - The result is set exactly once, on the transition into RESOLUTION

pub mod combat;
pub mod puzzle;

use serde::{Deserialize, Serialize};
use std::fmt;

use grimoire::SpellCastResult;

use crate::presenter::Presenter;

use self::combat::CombatEncounter;
use self::puzzle::PuzzleEncounter;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterState {
    /// Constructed, not yet started.
    Setup,
    /// Running; updated every frame.
    Action,
    /// Decided; waiting for the manager to complete it.
    Resolution,
    /// Cleaned up.
    Complete,
}

/// Outcome of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterResult {
    /// The player won.
    Victory,
    /// The player lost.
    Defeat,
    /// Not decided yet.
    Ongoing,
}

impl fmt::Display for EncounterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Ongoing => "ongoing",
        };
        f.write_str(name)
    }
}

/// Encounter categories a plan can name.
///
/// Only COMBAT and PUZZLE have implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterType {
    /// Turn-based fight against an enemy.
    Combat,
    /// Trap encounter.
    Trap,
    /// Timed target puzzle.
    Puzzle,
    /// Prey hunt encounter.
    PreyHunt,
}

impl fmt::Display for EncounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Combat => "combat",
            Self::Trap => "trap",
            Self::Puzzle => "puzzle",
            Self::PreyHunt => "prey_hunt",
        };
        f.write_str(name)
    }
}

/// Hooks every encounter kind supplies to the lifecycle.
pub trait EncounterBehavior {
    /// Pushes initial state to the presenter.
    fn setup(&mut self, presenter: &mut dyn Presenter);

    /// Advances one frame. `delta` is the elapsed time since the previous
    /// frame in milliseconds; `time` is the host clock and is informational.
    fn update(&mut self, time: f64, delta: f64, presenter: &mut dyn Presenter);

    /// Whether the player has won.
    fn check_victory_condition(&mut self) -> bool;

    /// Whether the player has lost.
    fn check_defeat_condition(&mut self) -> bool;

    /// Tears down presenter state.
    fn cleanup(&mut self, result: EncounterResult, presenter: &mut dyn Presenter);
}

/// The lifecycle wrapper around a behavior.
#[derive(Debug, Clone)]
pub struct Encounter<B = EncounterKind> {
    state: EncounterState,
    result: EncounterResult,
    behavior: B,
}

impl<B: EncounterBehavior> Encounter<B> {
    /// Wraps a behavior in SETUP.
    pub fn new(behavior: B) -> Self {
        Self {
            state: EncounterState::Setup,
            result: EncounterResult::Ongoing,
            behavior,
        }
    }

    /// Runs setup and enters ACTION. Ignored unless in SETUP.
    pub fn start(&mut self, presenter: &mut dyn Presenter) {
        if self.state != EncounterState::Setup {
            tracing::warn!(state = ?self.state, "encounter already started");
            return;
        }
        self.behavior.setup(presenter);
        self.state = EncounterState::Action;
    }

    /// Per-frame driver. Only acts in ACTION.
    pub fn update_encounter(&mut self, time: f64, delta: f64, presenter: &mut dyn Presenter) {
        if self.state != EncounterState::Action {
            return;
        }

        self.behavior.update(time, delta, presenter);

        if self.behavior.check_victory_condition() {
            self.resolve(EncounterResult::Victory);
        } else if self.behavior.check_defeat_condition() {
            self.resolve(EncounterResult::Defeat);
        }
    }

    fn resolve(&mut self, result: EncounterResult) {
        tracing::debug!(%result, "encounter resolved");
        self.result = result;
        self.state = EncounterState::Resolution;
    }

    /// Enters COMPLETE and runs cleanup. Idempotent.
    pub fn complete(&mut self, presenter: &mut dyn Presenter) {
        if self.state == EncounterState::Complete {
            return;
        }
        self.state = EncounterState::Complete;
        self.behavior.cleanup(self.result, presenter);
    }

    /// Runs cleanup without changing state, for an encounter being replaced.
    pub fn cleanup(&mut self, presenter: &mut dyn Presenter) {
        self.behavior.cleanup(self.result, presenter);
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EncounterState {
        self.state
    }

    /// Current result.
    #[must_use]
    pub fn result(&self) -> EncounterResult {
        self.result
    }

    /// The wrapped behavior.
    #[must_use]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The wrapped behavior, mutably.
    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }
}

impl Encounter<EncounterKind> {
    /// Forwards a resolved spell cast. Ignored outside ACTION.
    ///
    /// Returns true if the encounter applied the cast.
    pub fn handle_player_spell(
        &mut self,
        cast: &SpellCastResult,
        presenter: &mut dyn Presenter,
    ) -> bool {
        if self.state != EncounterState::Action {
            tracing::debug!(
                state = ?self.state,
                spell = %cast.recipe_name,
                "spell outside action; ignored"
            );
            return false;
        }
        self.behavior.handle_player_spell(cast, presenter)
    }

    /// Whether a cast delivered now would be applied.
    #[must_use]
    pub fn accepts_player_spell(&self) -> bool {
        self.state == EncounterState::Action && self.behavior.accepts_player_spell()
    }
}

/// The implemented encounter kinds.
#[derive(Debug, Clone)]
pub enum EncounterKind {
    /// Turn-based combat.
    Combat(CombatEncounter),
    /// Timed target puzzle.
    Puzzle(PuzzleEncounter),
}

impl EncounterKind {
    /// The plan category this kind implements.
    #[must_use]
    pub fn encounter_type(&self) -> EncounterType {
        match self {
            Self::Combat(_) => EncounterType::Combat,
            Self::Puzzle(_) => EncounterType::Puzzle,
        }
    }

    /// Identifier recorded in the completed-encounter log, e.g. `combat:lizard`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Combat(c) => format!("combat:{}", c.enemy().id),
            Self::Puzzle(p) => format!("puzzle:{}", p.config().hazard.id),
        }
    }

    /// Applies a resolved spell cast.
    pub fn handle_player_spell(
        &mut self,
        cast: &SpellCastResult,
        presenter: &mut dyn Presenter,
    ) -> bool {
        match self {
            Self::Combat(c) => c.handle_player_spell(cast, presenter),
            Self::Puzzle(p) => p.handle_player_spell(cast, presenter),
        }
    }

    /// Whether a cast delivered now would be applied.
    #[must_use]
    pub fn accepts_player_spell(&self) -> bool {
        match self {
            Self::Combat(c) => c.accepts_player_spell(),
            Self::Puzzle(p) => p.accepts_player_spell(),
        }
    }

    /// The combat encounter, if this is one.
    #[must_use]
    pub fn as_combat(&self) -> Option<&CombatEncounter> {
        match self {
            Self::Combat(c) => Some(c),
            Self::Puzzle(_) => None,
        }
    }

    /// The puzzle encounter, if this is one.
    #[must_use]
    pub fn as_puzzle(&self) -> Option<&PuzzleEncounter> {
        match self {
            Self::Puzzle(p) => Some(p),
            Self::Combat(_) => None,
        }
    }
}

impl From<CombatEncounter> for EncounterKind {
    fn from(combat: CombatEncounter) -> Self {
        Self::Combat(combat)
    }
}

impl From<PuzzleEncounter> for EncounterKind {
    fn from(puzzle: PuzzleEncounter) -> Self {
        Self::Puzzle(puzzle)
    }
}

impl EncounterBehavior for EncounterKind {
    fn setup(&mut self, presenter: &mut dyn Presenter) {
        match self {
            Self::Combat(c) => c.setup(presenter),
            Self::Puzzle(p) => p.setup(presenter),
        }
    }

    fn update(&mut self, time: f64, delta: f64, presenter: &mut dyn Presenter) {
        match self {
            Self::Combat(c) => c.update(time, delta, presenter),
            Self::Puzzle(p) => p.update(time, delta, presenter),
        }
    }

    fn check_victory_condition(&mut self) -> bool {
        match self {
            Self::Combat(c) => c.check_victory_condition(),
            Self::Puzzle(p) => p.check_victory_condition(),
        }
    }

    fn check_defeat_condition(&mut self) -> bool {
        match self {
            Self::Combat(c) => c.check_defeat_condition(),
            Self::Puzzle(p) => p.check_defeat_condition(),
        }
    }

    fn cleanup(&mut self, result: EncounterResult, presenter: &mut dyn Presenter) {
        match self {
            Self::Combat(c) => c.cleanup(result, presenter),
            Self::Puzzle(p) => p.cleanup(result, presenter),
        }
    }
}
