//! Turn-based combat against a single enemy.
//!
//! # Turn cycle
//!
//! ```text
//! PLAYER_TURN --spell--> ENEMY_TURN --delay--> WAITING --delay--> PLAYER_TURN
//! ```
//!
//! PLAYER_TURN is passive until a spell cast arrives. Both delays are
//! accumulated frame time compared against `turn_delay_ms`, so pacing does
//! not depend on frame rate.
//!
//! The enemy's next action is committed when PLAYER_TURN begins, which lets
//! the intent hint be generated once and shown for the whole turn.
//!
//! # Damage against the player
//!
//! Defense absorbs incoming damage and is then consumed by the full incoming
//! amount, not by the amount it absorbed:
//!
//! ```text
//! taken   = max(0, damage - defense)
//! defense = max(0, defense - damage)
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use grimoire::SpellCastResult;

use crate::ai::{self, ActionWeights, Cooldowns, EnemyAction, EnemyStance};
use crate::config::CombatConfig;
use crate::enemy::{EnemyData, EnemyRegistry};
use crate::error::{EncounterError, Result};
use crate::presenter::Presenter;

use super::{EncounterBehavior, EncounterResult};

/// Phase within a combat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    /// Waiting for the player's spell.
    PlayerTurn,
    /// Enemy acts after the turn delay.
    EnemyTurn,
    /// Pause before control returns to the player.
    Waiting,
}

/// A fight between the player and one enemy.
#[derive(Debug, Clone)]
pub struct CombatEncounter {
    enemy: EnemyData,
    config: CombatConfig,
    weights: ActionWeights,
    enemy_health: u32,
    player_health: u32,
    player_max_health: u32,
    player_defense: u32,
    phase: CombatPhase,
    turn_timer: f64,
    turns_completed: u32,
    next_action: Option<EnemyAction>,
    last_action: Option<EnemyAction>,
    hint: Option<String>,
    cooldowns: Cooldowns,
    stance: EnemyStance,
    rng: ChaCha8Rng,
}

impl CombatEncounter {
    /// Builds a fight against the registry entry `enemy_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::UnknownEnemy`] if the id is not registered.
    pub fn new(
        enemy_id: &str,
        registry: &EnemyRegistry,
        config: CombatConfig,
        seed: u64,
    ) -> Result<Self> {
        let enemy = registry
            .get(enemy_id)
            .ok_or_else(|| EncounterError::UnknownEnemy(enemy_id.to_string()))?;
        Ok(Self::from_enemy(enemy.clone(), config, seed))
    }

    /// Builds a fight against an explicit stat block.
    #[must_use]
    pub fn from_enemy(enemy: EnemyData, config: CombatConfig, seed: u64) -> Self {
        Self {
            weights: ActionWeights::for_enemy(&enemy.id),
            enemy_health: enemy.max_health,
            player_health: config.player_max_health,
            player_max_health: config.player_max_health,
            player_defense: 0,
            phase: CombatPhase::PlayerTurn,
            turn_timer: 0.0,
            turns_completed: 0,
            next_action: None,
            last_action: None,
            hint: None,
            cooldowns: Cooldowns::new(),
            stance: EnemyStance::empty(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            enemy,
            config,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The enemy's stat block.
    #[must_use]
    pub fn enemy(&self) -> &EnemyData {
        &self.enemy
    }

    /// Enemy health as `(current, max)`.
    #[must_use]
    pub fn enemy_health(&self) -> (u32, u32) {
        (self.enemy_health, self.enemy.max_health)
    }

    /// Player health as `(current, max)`.
    #[must_use]
    pub fn player_health(&self) -> (u32, u32) {
        (self.player_health, self.player_max_health)
    }

    /// Defense waiting to absorb the next enemy attack.
    #[must_use]
    pub fn player_defense(&self) -> u32 {
        self.player_defense
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    /// Number of full turns (player then enemy) completed.
    #[must_use]
    pub fn turns_completed(&self) -> u32 {
        self.turns_completed
    }

    /// The enemy's committed next action.
    #[must_use]
    pub fn next_action(&self) -> Option<EnemyAction> {
        self.next_action
    }

    /// The action the enemy executed last.
    #[must_use]
    pub fn last_action(&self) -> Option<EnemyAction> {
        self.last_action
    }

    /// The enemy's current stance.
    #[must_use]
    pub fn stance(&self) -> EnemyStance {
        self.stance
    }

    /// Action cooldowns.
    #[must_use]
    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    /// The (possibly misleading) hint about the committed action.
    #[must_use]
    pub fn enemy_action_hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Exact description of the committed action.
    #[must_use]
    pub fn enemy_action_text(&self) -> Option<&'static str> {
        self.next_action.map(EnemyAction::text)
    }

    /// Whether either side is down.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.enemy_health == 0 || self.player_health == 0
    }

    /// Whether a spell delivered now would be applied.
    #[must_use]
    pub fn accepts_player_spell(&self) -> bool {
        self.phase == CombatPhase::PlayerTurn && !self.is_over()
    }

    #[allow(clippy::cast_precision_loss)]
    fn health_fraction(&self) -> f64 {
        if self.enemy.max_health == 0 {
            return 0.0;
        }
        f64::from(self.enemy_health) / f64::from(self.enemy.max_health)
    }

    // =========================================================================
    // Player side
    // =========================================================================

    /// Applies a resolved spell cast and hands the turn to the enemy.
    ///
    /// Ignored (returns false) unless it is the player's turn.
    pub fn handle_player_spell(
        &mut self,
        cast: &SpellCastResult,
        presenter: &mut dyn Presenter,
    ) -> bool {
        if !self.accepts_player_spell() {
            tracing::debug!(
                phase = ?self.phase,
                spell = %cast.recipe_name,
                "not the player's turn; spell ignored"
            );
            return false;
        }

        let damage = cast.damage_amount();
        if damage > 0 {
            self.enemy_health = self.enemy_health.saturating_sub(damage);
            presenter.set_enemy_health(self.enemy_health, self.enemy.max_health);
            presenter.show_player_attack_effect(damage);
            presenter.show_damage_effect(damage, true);
            tracing::debug!(
                spell = %cast.recipe_name,
                damage,
                enemy_health = self.enemy_health,
                "player spell hits"
            );
        }

        let healing = cast.healing_amount();
        if healing > 0 {
            self.player_health = self
                .player_health
                .saturating_add(healing)
                .min(self.player_max_health);
            presenter.set_player_health(self.player_health, self.player_max_health);
            presenter.show_healing_effect(healing);
            tracing::debug!(spell = %cast.recipe_name, healing, "player heals");
        }

        let defense = cast.defense_amount();
        if defense > 0 {
            self.player_defense = self.player_defense.saturating_add(defense);
            presenter.show_defense_effect(defense);
            tracing::debug!(
                spell = %cast.recipe_name,
                defense = self.player_defense,
                "player defense up"
            );
        }

        self.phase = CombatPhase::EnemyTurn;
        self.turn_timer = 0.0;
        presenter.set_player_turn(false);
        true
    }

    // =========================================================================
    // Enemy side
    // =========================================================================

    /// Picks and commits the enemy's next action, and rolls its hint.
    ///
    /// Runs when the player's turn begins, so the wounded bias sees the
    /// enemy's health before the player's spell lands. A spell that drops the
    /// enemy below the wounded threshold shifts the weights from the next
    /// turn on, not for the action already committed.
    pub fn decide_next_enemy_action(&mut self) -> EnemyAction {
        let action = ai::choose_action(
            &self.weights,
            &self.cooldowns,
            self.health_fraction(),
            &self.config,
            &mut self.rng,
        );
        self.commit_action(action);
        action
    }

    /// Commits a specific action as the enemy's next, replacing any earlier
    /// choice, and rolls its hint.
    pub fn commit_action(&mut self, action: EnemyAction) {
        let hint = ai::action_hint(action, &self.enemy, &mut self.rng);
        tracing::debug!(enemy = %self.enemy.id, %action, %hint, "enemy action committed");
        self.next_action = Some(action);
        self.hint = Some(hint);
    }

    fn execute_enemy_turn(&mut self, presenter: &mut dyn Presenter) {
        self.stance = EnemyStance::empty();

        let action = match self.next_action.take() {
            Some(action) => action,
            None => {
                self.decide_next_enemy_action();
                self.next_action.take().unwrap_or(EnemyAction::Attack)
            }
        };
        self.hint = None;

        match action {
            EnemyAction::Attack => {
                self.strike_player(self.enemy.damage, presenter);
            }
            EnemyAction::HeavyAttack => {
                let damage = scale_damage(self.enemy.damage, self.config.heavy_attack_multiplier);
                self.strike_player(damage, presenter);
            }
            EnemyAction::Block => {
                self.stance.insert(EnemyStance::BLOCKING);
                presenter.show_enemy_stance(action.text());
            }
            EnemyAction::Parry => {
                self.stance.insert(EnemyStance::PARRYING);
                presenter.show_enemy_stance(action.text());
            }
        }

        self.cooldowns.tick();
        self.cooldowns.set(action, Cooldowns::cost(action, &self.config));
        self.last_action = Some(action);
    }

    fn strike_player(&mut self, damage: u32, presenter: &mut dyn Presenter) {
        let taken = damage.saturating_sub(self.player_defense);
        self.player_health = self.player_health.saturating_sub(taken);

        if self.player_defense > 0 {
            tracing::debug!(
                enemy = %self.enemy.id,
                damage,
                blocked = damage.min(self.player_defense),
                taken,
                "enemy attack partly absorbed"
            );
            self.player_defense = self.player_defense.saturating_sub(damage);
        } else {
            tracing::debug!(enemy = %self.enemy.id, taken, "enemy attacks");
        }

        presenter.set_player_health(self.player_health, self.player_max_health);
        presenter.show_enemy_attack_effect(taken);
        presenter.show_damage_effect(taken, false);
    }

    fn begin_player_turn(&mut self, presenter: &mut dyn Presenter) {
        self.phase = CombatPhase::PlayerTurn;
        self.turn_timer = 0.0;
        if self.next_action.is_none() {
            self.decide_next_enemy_action();
        }
        presenter.set_player_turn(true);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_damage(damage: u32, multiplier: f64) -> u32 {
    (f64::from(damage) * multiplier).round().max(0.0) as u32
}

impl EncounterBehavior for CombatEncounter {
    fn setup(&mut self, presenter: &mut dyn Presenter) {
        tracing::info!(enemy = %self.enemy.display_name, "combat encounter started");
        presenter.set_enemy(&self.enemy);
        presenter.set_enemy_health(self.enemy_health, self.enemy.max_health);
        presenter.set_player_health(self.player_health, self.player_max_health);
        presenter.show_combat_ui(true);
        self.begin_player_turn(presenter);
    }

    fn update(&mut self, _time: f64, delta: f64, presenter: &mut dyn Presenter) {
        if self.is_over() {
            return;
        }

        match self.phase {
            CombatPhase::PlayerTurn => {}
            CombatPhase::EnemyTurn => {
                self.turn_timer += delta;
                if self.turn_timer >= self.config.turn_delay_ms {
                    self.execute_enemy_turn(presenter);
                    self.turn_timer = 0.0;
                    self.phase = CombatPhase::Waiting;
                }
            }
            CombatPhase::Waiting => {
                self.turn_timer += delta;
                if self.turn_timer >= self.config.turn_delay_ms {
                    self.turns_completed += 1;
                    self.begin_player_turn(presenter);
                }
            }
        }
    }

    fn check_victory_condition(&mut self) -> bool {
        self.enemy_health == 0
    }

    fn check_defeat_condition(&mut self) -> bool {
        self.player_health == 0
    }

    fn cleanup(&mut self, result: EncounterResult, presenter: &mut dyn Presenter) {
        tracing::info!(
            enemy = %self.enemy.display_name,
            %result,
            turns = self.turns_completed,
            "combat encounter ended"
        );
        presenter.show_combat_ui(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::NullPresenter;
    use grimoire::{SpellDatabase, SpellEffectsSystem};

    const FRAME: f64 = 16.0;

    fn lizard_fight() -> CombatEncounter {
        let mut fight =
            CombatEncounter::new("lizard", &EnemyRegistry::standard(), CombatConfig::default(), 1)
                .unwrap();
        fight.setup(&mut NullPresenter);
        fight
    }

    fn cast(id: &str, accuracy: f64) -> SpellCastResult {
        let db = SpellDatabase::standard();
        SpellEffectsSystem::new().cast_spell(db.recipe(id).unwrap(), accuracy)
    }

    fn defense_cast(defense: u32) -> SpellCastResult {
        let mut result = cast("gather", 1.0);
        result.defense = Some(defense);
        result
    }

    /// Runs frames until the phase changes or `max_frames` elapse.
    fn run_until_phase(fight: &mut CombatEncounter, phase: CombatPhase, max_frames: u32) {
        for _ in 0..max_frames {
            if fight.phase() == phase {
                return;
            }
            fight.update(0.0, FRAME, &mut NullPresenter);
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn unknown_enemy_is_an_error() {
            let registry = EnemyRegistry::standard();
            let err = CombatEncounter::new("dragon", &registry, CombatConfig::default(), 1)
                .unwrap_err();
            assert_eq!(err, EncounterError::UnknownEnemy("dragon".into()));
        }

        #[test]
        fn setup_commits_first_action_and_hint() {
            let fight = lizard_fight();
            assert_eq!(fight.phase(), CombatPhase::PlayerTurn);
            assert!(fight.next_action().is_some());
            assert!(fight.enemy_action_hint().is_some());
            assert_eq!(fight.enemy_health(), (100, 100));
            assert_eq!(fight.player_health(), (100, 100));
        }
    }

    mod player_spell_tests {
        use super::*;

        #[test]
        fn perfect_ember_takes_25() {
            let mut fight = lizard_fight();
            assert!(fight.handle_player_spell(&cast("ember", 1.0), &mut NullPresenter));
            assert_eq!(fight.enemy_health().0, 75);
            assert_eq!(fight.phase(), CombatPhase::EnemyTurn);
        }

        #[test]
        fn missed_ember_takes_18() {
            let mut fight = lizard_fight();
            fight.handle_player_spell(&cast("ember", 0.0), &mut NullPresenter);
            assert_eq!(fight.enemy_health().0, 82);
        }

        #[test]
        fn spell_outside_player_turn_is_ignored() {
            let mut fight = lizard_fight();
            fight.handle_player_spell(&cast("ember", 1.0), &mut NullPresenter);
            assert!(!fight.handle_player_spell(&cast("ember", 1.0), &mut NullPresenter));
            assert_eq!(fight.enemy_health().0, 75);
        }

        #[test]
        fn healing_is_capped_at_max() {
            let mut fight = lizard_fight();
            fight.handle_player_spell(&cast("vigor", 1.0), &mut NullPresenter);
            assert_eq!(fight.player_health(), (100, 100));
        }

        #[test]
        fn defense_accumulates() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Block);
            fight.handle_player_spell(&defense_cast(10), &mut NullPresenter);
            run_until_phase(&mut fight, CombatPhase::PlayerTurn, 500);
            fight.commit_action(EnemyAction::Parry);
            fight.handle_player_spell(&defense_cast(5), &mut NullPresenter);
            assert_eq!(fight.player_defense(), 15);
        }

        #[test]
        fn overkill_floors_enemy_at_zero() {
            let mut fight = lizard_fight();
            let mut big = cast("ember", 1.0);
            big.damage = Some(500);
            fight.handle_player_spell(&big, &mut NullPresenter);
            assert_eq!(fight.enemy_health().0, 0);
            assert!(fight.check_victory_condition());
            assert!(!fight.accepts_player_spell());
        }
    }

    mod enemy_turn_tests {
        use super::*;

        #[test]
        fn committed_action_survives_wounding_hit() {
            let mut fight = lizard_fight();
            let committed = fight.next_action();

            let mut hit = cast("ember", 1.0);
            hit.damage = Some(80);
            fight.handle_player_spell(&hit, &mut NullPresenter);
            assert_eq!(fight.enemy_health().0, 20);
            assert_eq!(fight.next_action(), committed);

            fight.update(0.0, 1000.0, &mut NullPresenter);
            assert_eq!(fight.last_action(), committed);
        }

        #[test]
        fn enemy_waits_for_turn_delay() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Attack);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);

            fight.update(0.0, 999.0, &mut NullPresenter);
            assert_eq!(fight.phase(), CombatPhase::EnemyTurn);
            assert_eq!(fight.player_health().0, 100);

            fight.update(0.0, 1.0, &mut NullPresenter);
            assert_eq!(fight.phase(), CombatPhase::Waiting);
            assert_eq!(fight.player_health().0, 85);
        }

        #[test]
        fn waiting_returns_to_player_turn() {
            let mut fight = lizard_fight();
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);
            assert_eq!(fight.phase(), CombatPhase::PlayerTurn);
            assert_eq!(fight.turns_completed(), 1);
            assert!(fight.next_action().is_some());
        }

        #[test]
        fn defense_absorbs_and_is_consumed_by_full_damage() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Attack);
            fight.handle_player_spell(&defense_cast(10), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);

            assert_eq!(fight.player_health().0, 95);
            assert_eq!(fight.player_defense(), 0);
        }

        #[test]
        fn small_attack_only_depletes_its_own_amount() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Attack);
            fight.handle_player_spell(&defense_cast(40), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);

            assert_eq!(fight.player_health().0, 100);
            assert_eq!(fight.player_defense(), 25);
        }

        #[test]
        fn heavy_attack_scales_and_goes_on_cooldown() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::HeavyAttack);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);

            // 15 * 1.5 = 22.5 rounds to 23
            assert_eq!(fight.player_health().0, 77);
            assert_eq!(fight.cooldowns().remaining(EnemyAction::HeavyAttack), 2);
            assert_eq!(fight.last_action(), Some(EnemyAction::HeavyAttack));
        }

        #[test]
        fn block_sets_stance_without_damage() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Block);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);

            assert!(fight.stance().contains(EnemyStance::BLOCKING));
            assert_eq!(fight.player_health().0, 100);
            assert_eq!(fight.cooldowns().remaining(EnemyAction::Block), 1);
        }

        #[test]
        fn stance_clears_on_next_enemy_turn() {
            let mut fight = lizard_fight();
            fight.commit_action(EnemyAction::Parry);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);

            fight.commit_action(EnemyAction::Attack);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);
            assert!(fight.stance().is_empty());
        }

        #[test]
        fn cooldown_blocks_reuse() {
            let mut fight = lizard_fight();
            for _ in 0..30 {
                let executed_heavy = fight.next_action() == Some(EnemyAction::HeavyAttack);
                fight.handle_player_spell(&cast("vigor", 1.0), &mut NullPresenter);
                fight.update(0.0, 1000.0, &mut NullPresenter);
                fight.update(0.0, 1000.0, &mut NullPresenter);
                if executed_heavy {
                    assert_ne!(fight.next_action(), Some(EnemyAction::HeavyAttack));
                }
            }
        }

        #[test]
        fn nothing_happens_once_player_is_down() {
            let mut fight = lizard_fight();
            fight.player_health = 10;
            fight.commit_action(EnemyAction::Attack);
            fight.handle_player_spell(&cast("gather", 1.0), &mut NullPresenter);
            fight.update(0.0, 1000.0, &mut NullPresenter);
            assert_eq!(fight.player_health().0, 0);
            assert!(fight.check_defeat_condition());

            fight.update(0.0, 5000.0, &mut NullPresenter);
            assert_eq!(fight.phase(), CombatPhase::Waiting);
        }
    }

    #[test]
    fn enemy_action_text_matches_committed_action() {
        let mut fight = lizard_fight();
        fight.commit_action(EnemyAction::Parry);
        assert_eq!(fight.enemy_action_text(), Some("Parry"));
    }
}
