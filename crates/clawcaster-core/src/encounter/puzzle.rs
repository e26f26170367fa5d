//! Timed target puzzles.
//!
//! The player must accumulate `target` points before the clock runs out.
//! Damage counts for DAMAGE hazards and defense counts for BLOCKING hazards.
//! Healing from the same cast is only shown, never counted.

use grimoire::SpellCastResult;

use crate::hazard::{PuzzleConfig, PuzzleType};
use crate::presenter::Presenter;

use super::{EncounterBehavior, EncounterResult};

/// Progress toward a puzzle's target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuzzleProgress {
    /// Points accumulated.
    pub current: u32,
    /// Points required.
    pub target: u32,
    /// `current / target` as a percentage, capped at 100.
    pub percentage: f64,
}

/// A puzzle encounter.
#[derive(Debug, Clone)]
pub struct PuzzleEncounter {
    config: PuzzleConfig,
    player_max_health: u32,
    progress: u32,
    time_remaining: f64,
    completed: bool,
}

impl PuzzleEncounter {
    /// Creates a puzzle from a generated config.
    #[must_use]
    pub fn new(config: PuzzleConfig, player_max_health: u32) -> Self {
        tracing::debug!(
            hazard = %config.hazard.id,
            target = config.target,
            time_limit = config.time_limit,
            "puzzle generated"
        );
        Self {
            time_remaining: f64::from(config.time_limit),
            config,
            player_max_health,
            progress: 0,
            completed: false,
        }
    }

    /// The generated config.
    #[must_use]
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Progress toward the target.
    #[must_use]
    pub fn progress(&self) -> PuzzleProgress {
        let percentage = if self.config.target == 0 {
            100.0
        } else {
            (f64::from(self.progress) / f64::from(self.config.target) * 100.0).min(100.0)
        };
        PuzzleProgress {
            current: self.progress,
            target: self.config.target,
            percentage,
        }
    }

    /// Seconds left, floored at zero.
    #[must_use]
    pub fn time_remaining(&self) -> f64 {
        self.time_remaining.max(0.0)
    }

    /// What the puzzle counts.
    #[must_use]
    pub fn puzzle_type(&self) -> PuzzleType {
        self.config.hazard.kind
    }

    /// Name of the hazard.
    #[must_use]
    pub fn hazard_name(&self) -> &str {
        &self.config.hazard.display_name
    }

    /// Goal line, e.g. `Deal 80 damage in 120s`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn goal_text(&self) -> String {
        let remaining = self.remaining();
        let time_left = self.time_remaining().ceil() as i64;
        match self.config.hazard.kind {
            PuzzleType::Damage => format!("Deal {remaining} damage in {time_left}s"),
            PuzzleType::Blocking => format!("Block {remaining} damage in {time_left}s"),
        }
    }

    /// Whether the puzzle has been decided.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether a spell delivered now would be applied.
    #[must_use]
    pub fn accepts_player_spell(&self) -> bool {
        !self.completed
    }

    fn remaining(&self) -> u32 {
        self.config.target.saturating_sub(self.progress)
    }

    fn show_progress(&self, presenter: &mut dyn Presenter) {
        presenter.set_enemy_health(self.remaining(), self.config.target);
    }

    /// Counts a resolved spell cast toward the target.
    pub fn handle_player_spell(
        &mut self,
        cast: &SpellCastResult,
        presenter: &mut dyn Presenter,
    ) -> bool {
        if self.completed {
            return false;
        }

        match self.config.hazard.kind {
            PuzzleType::Damage => {
                let damage = cast.damage_amount();
                if damage > 0 {
                    self.progress = self.progress.saturating_add(damage);
                    presenter.show_player_attack_effect(damage);
                    presenter.show_damage_effect(damage, true);
                }
            }
            PuzzleType::Blocking => {
                let defense = cast.defense_amount();
                if defense > 0 {
                    self.progress = self.progress.saturating_add(defense);
                    presenter.show_defense_effect(defense);
                }
            }
        }
        tracing::debug!(
            spell = %cast.recipe_name,
            progress = self.progress,
            target = self.config.target,
            "puzzle progress"
        );

        self.show_progress(presenter);
        presenter.set_puzzle_goal(&self.goal_text());

        let healing = cast.healing_amount();
        if healing > 0 {
            presenter.show_healing_effect(healing);
        }
        true
    }
}

impl EncounterBehavior for PuzzleEncounter {
    fn setup(&mut self, presenter: &mut dyn Presenter) {
        tracing::info!(hazard = %self.config.hazard.display_name, "puzzle encounter started");
        presenter.set_enemy(&self.config.hazard.as_enemy_display(self.config.target));
        self.show_progress(presenter);
        presenter.set_player_health(self.player_max_health, self.player_max_health);
        presenter.show_combat_ui(true);
        presenter.set_player_turn(true);
        presenter.set_puzzle_timer(self.time_remaining());
        presenter.set_puzzle_goal(&self.goal_text());
    }

    fn update(&mut self, _time: f64, delta: f64, presenter: &mut dyn Presenter) {
        if self.completed {
            return;
        }
        self.time_remaining -= delta / 1000.0;
        presenter.set_puzzle_timer(self.time_remaining());
        self.show_progress(presenter);
    }

    fn check_victory_condition(&mut self) -> bool {
        let victory = self.progress >= self.config.target;
        if victory && !self.completed {
            self.completed = true;
        }
        victory
    }

    fn check_defeat_condition(&mut self) -> bool {
        let defeat = self.time_remaining <= 0.0 && self.progress < self.config.target;
        if defeat && !self.completed {
            self.completed = true;
        }
        defeat
    }

    fn cleanup(&mut self, result: EncounterResult, presenter: &mut dyn Presenter) {
        tracing::info!(
            hazard = %self.config.hazard.display_name,
            %result,
            progress = self.progress,
            target = self.config.target,
            time_remaining = self.time_remaining(),
            "puzzle encounter ended"
        );
        presenter.show_combat_ui(false);
        presenter.clear_puzzle_ui();
    }
}
