//! Test doubles and drivers.

use grimoire::{SpellDatabase, SpellRecipe};

use crate::encounter::{EncounterResult, EncounterState};
use crate::enemy::EnemyData;
use crate::manager::EncounterManager;
use crate::presenter::Presenter;

/// Frame length used by the drivers, ms.
pub const FRAME_MS: f64 = 16.0;

/// Installs a test-writer subscriber so `tracing` output shows up on failure.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Recording presenter
// =============================================================================

/// One presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetEnemy(String),
    EnemyHealth(u32, u32),
    PlayerHealth(u32, u32),
    CombatUi(bool),
    PlayerTurn(bool),
    Damage(u32, bool),
    Healing(u32),
    Defense(u32),
    PlayerAttack(u32),
    EnemyAttack(u32),
    EnemyStance(String),
    PuzzleTimer(f64),
    PuzzleGoal(String),
    ClearPuzzle,
    Result(EncounterResult),
    UnlockSlot,
    FullHeal,
    MapComplete,
    NormalState,
}

/// Presenter that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<Call>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.calls.contains(call)
    }

    pub fn results(&self) -> Vec<EncounterResult> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Result(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Last player health pushed to the display.
    pub fn last_player_health(&self) -> Option<(u32, u32)> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::PlayerHealth(cur, max) => Some((*cur, *max)),
            _ => None,
        })
    }

    /// Last goal text pushed to the display.
    pub fn last_goal(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::PuzzleGoal(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn set_enemy(&mut self, enemy: &EnemyData) {
        self.calls.push(Call::SetEnemy(enemy.id.clone()));
    }

    fn set_enemy_health(&mut self, current: u32, max: u32) {
        self.calls.push(Call::EnemyHealth(current, max));
    }

    fn set_player_health(&mut self, current: u32, max: u32) {
        self.calls.push(Call::PlayerHealth(current, max));
    }

    fn show_combat_ui(&mut self, visible: bool) {
        self.calls.push(Call::CombatUi(visible));
    }

    fn set_player_turn(&mut self, is_player_turn: bool) {
        self.calls.push(Call::PlayerTurn(is_player_turn));
    }

    fn show_damage_effect(&mut self, amount: u32, to_enemy: bool) {
        self.calls.push(Call::Damage(amount, to_enemy));
    }

    fn show_healing_effect(&mut self, amount: u32) {
        self.calls.push(Call::Healing(amount));
    }

    fn show_defense_effect(&mut self, amount: u32) {
        self.calls.push(Call::Defense(amount));
    }

    fn show_player_attack_effect(&mut self, amount: u32) {
        self.calls.push(Call::PlayerAttack(amount));
    }

    fn show_enemy_attack_effect(&mut self, amount: u32) {
        self.calls.push(Call::EnemyAttack(amount));
    }

    fn show_enemy_stance(&mut self, action_text: &str) {
        self.calls.push(Call::EnemyStance(action_text.to_string()));
    }

    fn set_puzzle_timer(&mut self, seconds: f64) {
        self.calls.push(Call::PuzzleTimer(seconds));
    }

    fn set_puzzle_goal(&mut self, text: &str) {
        self.calls.push(Call::PuzzleGoal(text.to_string()));
    }

    fn clear_puzzle_ui(&mut self) {
        self.calls.push(Call::ClearPuzzle);
    }

    fn show_encounter_result(&mut self, result: EncounterResult) {
        self.calls.push(Call::Result(result));
    }

    fn unlock_third_slot(&mut self) {
        self.calls.push(Call::UnlockSlot);
    }

    fn full_heal_player(&mut self) {
        self.calls.push(Call::FullHeal);
    }

    fn map_encounter_complete(&mut self) {
        self.calls.push(Call::MapComplete);
    }

    fn return_to_normal_state(&mut self) {
        self.calls.push(Call::NormalState);
    }
}

// =============================================================================
// Drivers
// =============================================================================

pub fn recipe(id: &str) -> SpellRecipe {
    SpellDatabase::standard()
        .recipe(id)
        .cloned()
        .unwrap_or_else(|| panic!("missing recipe {id}"))
}

/// Advances the manager by `ms` milliseconds in fixed frames.
pub fn run_for(manager: &mut EncounterManager, presenter: &mut dyn Presenter, ms: f64) {
    let mut elapsed = 0.0;
    while elapsed < ms {
        elapsed += FRAME_MS;
        manager.update(elapsed, FRAME_MS, presenter);
    }
}

/// Whether the held encounter has finished and is showing its result.
pub fn showing_result(manager: &EncounterManager) -> bool {
    manager
        .current_encounter()
        .is_some_and(|e| e.state() == EncounterState::Complete)
}

/// Casts `recipe` whenever the encounter accepts it until the held encounter
/// finishes or `max_ms` elapses.
pub fn fight_with(
    manager: &mut EncounterManager,
    presenter: &mut dyn Presenter,
    recipe: &SpellRecipe,
    accuracy: f64,
    max_ms: f64,
) {
    let mut elapsed = 0.0;
    while elapsed < max_ms && !showing_result(manager) {
        manager.cast_spell(recipe, accuracy, presenter);
        elapsed += FRAME_MS;
        manager.update(elapsed, FRAME_MS, presenter);
    }
}
