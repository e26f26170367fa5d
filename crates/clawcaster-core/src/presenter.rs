//! The outbound interface to the host's presentation layer.
//!
//! Every call is fire-and-forget: the core never reads anything back. All
//! methods default to no-ops so a host implements only what it renders.

use crate::encounter::EncounterResult;
use crate::enemy::EnemyData;

/// Presentation callbacks invoked by encounters and the manager.
///
/// # Example
///
/// ```
/// use clawcaster_core::{EncounterResult, Presenter};
///
/// #[derive(Default)]
/// struct Log(Vec<String>);
///
/// impl Presenter for Log {
///     fn show_encounter_result(&mut self, result: EncounterResult) {
///         self.0.push(format!("{result}"));
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait Presenter {
    /// Shows the opponent (an enemy, or a hazard in enemy form).
    fn set_enemy(&mut self, enemy: &EnemyData) {}

    /// Updates the opponent's health bar.
    fn set_enemy_health(&mut self, current: u32, max: u32) {}

    /// Updates the player's health bar.
    fn set_player_health(&mut self, current: u32, max: u32) {}

    /// Shows or hides the combat UI.
    fn show_combat_ui(&mut self, visible: bool) {}

    /// Toggles the turn indicator.
    fn set_player_turn(&mut self, is_player_turn: bool) {}

    /// Damage number; `to_enemy` is false when the player is hit.
    fn show_damage_effect(&mut self, amount: u32, to_enemy: bool) {}

    /// Healing number on the player.
    fn show_healing_effect(&mut self, amount: u32) {}

    /// Defense gained by the player.
    fn show_defense_effect(&mut self, amount: u32) {}

    /// Player attack animation.
    fn show_player_attack_effect(&mut self, amount: u32) {}

    /// Enemy attack animation.
    fn show_enemy_attack_effect(&mut self, amount: u32) {}

    /// Enemy raised a guard or readied a counter.
    fn show_enemy_stance(&mut self, action_text: &str) {}

    /// Puzzle countdown, seconds.
    fn set_puzzle_timer(&mut self, seconds: f64) {}

    /// Puzzle goal line.
    fn set_puzzle_goal(&mut self, text: &str) {}

    /// Removes the puzzle timer and goal.
    fn clear_puzzle_ui(&mut self) {}

    /// Shows the result window.
    ///
    /// The host acknowledges dismissal through
    /// [`on_encounter_result_closed`](crate::EncounterManager::on_encounter_result_closed).
    fn show_encounter_result(&mut self, result: EncounterResult) {}

    /// The player earned the third material slot. Sent once per run.
    fn unlock_third_slot(&mut self) {}

    /// Restores the player to full health.
    fn full_heal_player(&mut self) {}

    /// A map-launched encounter was won.
    fn map_encounter_complete(&mut self) {}

    /// No more encounters.
    fn return_to_normal_state(&mut self) {}
}

/// Presenter that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
