//! Encounter sequencing.
//!
//! The manager owns a queue of encounter plans and at most one active
//! encounter. When the active encounter resolves, the manager reports the
//! result, records it, heals the player on victory and completes the
//! encounter, but keeps it in the slot until the host acknowledges the result
//! window with [`EncounterManager::on_encounter_result_closed`]. Nothing new
//! can start while a result is on screen.
//!
//! The manager also owns the [`SpellEffectsSystem`] so duration effects tick
//! exactly once per completed combat turn, and the [`SpellCaster`] that turns
//! a timed confirm press into a cast.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use grimoire::{SpellCastResult, SpellEffectsSystem, SpellRecipe};

use crate::caster::{SelectedSpell, SpellCaster};
use crate::config::GameConfig;
use crate::encounter::combat::CombatEncounter;
use crate::encounter::puzzle::PuzzleEncounter;
use crate::encounter::{Encounter, EncounterKind, EncounterResult, EncounterState, EncounterType};
use crate::enemy::EnemyRegistry;
use crate::error::{EncounterError, Result};
use crate::hazard::{HazardTable, PuzzleGenerator, PuzzleType};
use crate::presenter::Presenter;

/// A plan for one encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Encounter category.
    pub kind: EncounterType,
    /// Enemy to fight, for combat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_id: Option<String>,
    /// Difficulty level, for puzzles. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u32>,
    /// Forced hazard type, for puzzles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_type: Option<PuzzleType>,
}

impl EncounterConfig {
    /// A fight against `enemy_id`.
    #[must_use]
    pub fn combat(enemy_id: impl Into<String>) -> Self {
        Self {
            kind: EncounterType::Combat,
            enemy_id: Some(enemy_id.into()),
            difficulty_level: None,
            puzzle_type: None,
        }
    }

    /// A puzzle at `difficulty_level`, optionally forcing its type.
    #[must_use]
    pub fn puzzle(difficulty_level: u32, puzzle_type: Option<PuzzleType>) -> Self {
        Self {
            kind: EncounterType::Puzzle,
            enemy_id: None,
            difficulty_level: Some(difficulty_level),
            puzzle_type,
        }
    }

    /// A bare plan of the given type with no parameters.
    #[must_use]
    pub fn of_type(kind: EncounterType) -> Self {
        Self {
            kind,
            enemy_id: None,
            difficulty_level: None,
            puzzle_type: None,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveEncounter {
    encounter: Encounter<EncounterKind>,
    plan: EncounterConfig,
}

impl ActiveEncounter {
    fn combat_turns(&self) -> u32 {
        self.encounter
            .behavior()
            .as_combat()
            .map_or(0, CombatEncounter::turns_completed)
    }
}

/// Sequences encounters and holds the active one.
///
/// # Example
///
/// ```
/// use clawcaster_core::{EncounterConfig, EncounterManager, GameConfig, NullPresenter};
/// use clawcaster_core::grimoire::SpellDatabase;
///
/// let db = SpellDatabase::standard();
/// let mut presenter = NullPresenter;
/// let mut manager = EncounterManager::new(GameConfig::default());
/// manager.enqueue(EncounterConfig::combat("lizard"));
/// manager.start_next_encounter(&mut presenter)?;
///
/// let cast = manager.cast_spell(db.recipe("ember").unwrap(), 1.0, &mut presenter).unwrap();
/// assert_eq!(cast.damage, Some(25));
/// # Ok::<(), clawcaster_core::EncounterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EncounterManager {
    config: GameConfig,
    enemies: Arc<EnemyRegistry>,
    hazards: Arc<HazardTable>,
    rng: ChaCha8Rng,
    queue: VecDeque<EncounterConfig>,
    current: Option<ActiveEncounter>,
    is_active: bool,
    is_map_encounter: bool,
    completed: Vec<String>,
    effects: SpellEffectsSystem,
    caster: SpellCaster,
}

impl EncounterManager {
    /// Creates a manager over the standard bestiary and hazards with an
    /// empty queue.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_registries(
            config,
            Arc::new(EnemyRegistry::standard()),
            Arc::new(HazardTable::standard()),
        )
    }

    /// Creates a manager over shared registries.
    #[must_use]
    pub fn with_registries(
        config: GameConfig,
        enemies: Arc<EnemyRegistry>,
        hazards: Arc<HazardTable>,
    ) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            caster: SpellCaster::new(config.arrow, config.input),
            config,
            enemies,
            hazards,
            queue: VecDeque::new(),
            current: None,
            is_active: false,
            is_map_encounter: false,
            completed: Vec::new(),
            effects: SpellEffectsSystem::new(),
        }
    }

    /// Creates a manager with the standard run: lizard, a damage puzzle, fox,
    /// a blocking puzzle, crane.
    #[must_use]
    pub fn with_default_queue(config: GameConfig) -> Self {
        let mut manager = Self::new(config);
        manager.queue.extend([
            EncounterConfig::combat("lizard"),
            EncounterConfig::puzzle(1, Some(PuzzleType::Damage)),
            EncounterConfig::combat("fox"),
            EncounterConfig::puzzle(2, Some(PuzzleType::Blocking)),
            EncounterConfig::combat("crane"),
        ]);
        manager
    }

    /// Appends a plan to the queue.
    pub fn enqueue(&mut self, plan: EncounterConfig) {
        self.queue.push_back(plan);
    }

    // =========================================================================
    // Starting encounters
    // =========================================================================

    /// Starts the next queued encounter.
    ///
    /// Does nothing if an encounter is already held or the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns the construction error if the plan cannot be built. The plan
    /// is consumed and no encounter becomes active.
    pub fn start_next_encounter(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        if self.current.is_some() {
            tracing::warn!("cannot start a new encounter while one is active");
            return Ok(());
        }
        let Some(plan) = self.queue.pop_front() else {
            tracing::info!("no more encounters in queue");
            return Ok(());
        };

        let encounter = self.create_encounter(&plan)?;
        self.activate(encounter, plan, false, presenter);
        Ok(())
    }

    /// Starts a map-launched fight, discarding the queue.
    ///
    /// Does nothing if an encounter is already held.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::UnknownEnemy`] if the enemy is not
    /// registered. The queue is left untouched in that case.
    pub fn start_single_encounter(
        &mut self,
        enemy_id: &str,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        self.start_map_encounter(EncounterConfig::combat(enemy_id), presenter)
    }

    /// Starts a map-launched puzzle, discarding the queue.
    ///
    /// Does nothing if an encounter is already held.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::NoHazard`] if no hazard qualifies.
    pub fn start_single_puzzle_encounter(
        &mut self,
        difficulty_level: u32,
        puzzle_type: Option<PuzzleType>,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        let plan = EncounterConfig::puzzle(difficulty_level, puzzle_type);
        self.start_map_encounter(plan, presenter)
    }

    fn start_map_encounter(
        &mut self,
        plan: EncounterConfig,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        if self.current.is_some() {
            tracing::warn!("cannot start a new encounter while one is active");
            return Ok(());
        }
        let encounter = self.create_encounter(&plan)?;
        self.queue.clear();
        self.activate(encounter, plan, true, presenter);
        Ok(())
    }

    /// Tears down the held encounter and rebuilds it from its plan.
    ///
    /// # Errors
    ///
    /// Returns the construction error if the plan can no longer be built;
    /// the old encounter stays in the slot in that case.
    pub fn restart_current_encounter(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        let Some(plan) = self.current.as_ref().map(|active| active.plan.clone()) else {
            return Ok(());
        };
        let encounter = self.create_encounter(&plan)?;

        if let Some(mut old) = self.current.take() {
            old.encounter.cleanup(presenter);
        }
        tracing::info!(kind = %plan.kind, "restarting encounter");
        let map = self.is_map_encounter;
        self.activate(encounter, plan, map, presenter);
        Ok(())
    }

    fn create_encounter(&mut self, plan: &EncounterConfig) -> Result<Encounter<EncounterKind>> {
        let built = self.build_kind(plan);
        if let Err(err) = &built {
            tracing::error!(kind = %plan.kind, error = %err, "failed to create encounter");
        }
        built.map(Encounter::new)
    }

    fn build_kind(&mut self, plan: &EncounterConfig) -> Result<EncounterKind> {
        let seed: u64 = self.rng.gen();
        match plan.kind {
            EncounterType::Combat => {
                let enemy_id = plan
                    .enemy_id
                    .as_deref()
                    .ok_or(EncounterError::MissingEnemyId)?;
                let combat = CombatEncounter::new(
                    enemy_id,
                    &self.enemies,
                    self.config.combat.clone(),
                    seed,
                )?;
                Ok(combat.into())
            }
            EncounterType::Puzzle => {
                let level = plan.difficulty_level.unwrap_or(1);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let puzzle =
                    PuzzleGenerator::generate(&self.hazards, level, plan.puzzle_type, &mut rng)
                        .ok_or(EncounterError::NoHazard(plan.puzzle_type))?;
                Ok(PuzzleEncounter::new(puzzle, self.config.combat.player_max_health).into())
            }
            other @ (EncounterType::Trap | EncounterType::PreyHunt) => {
                Err(EncounterError::Unsupported(other))
            }
        }
    }

    fn activate(
        &mut self,
        encounter: Encounter<EncounterKind>,
        plan: EncounterConfig,
        map: bool,
        presenter: &mut dyn Presenter,
    ) {
        tracing::info!(
            kind = %plan.kind,
            label = %encounter.behavior().label(),
            map,
            remaining = self.queue.len(),
            "starting encounter"
        );
        self.effects.clear_all_effects();
        self.caster.end();

        let mut active = ActiveEncounter { encounter, plan };
        active.encounter.start(presenter);
        self.current = Some(active);
        self.is_active = true;
        self.is_map_encounter = map;
    }

    // =========================================================================
    // Per-frame driving
    // =========================================================================

    /// Drives the held encounter one frame and handles its resolution.
    pub fn update(&mut self, time: f64, delta: f64, presenter: &mut dyn Presenter) {
        self.caster.advance(delta);
        if !self.is_active {
            return;
        }
        let Some(active) = self.current.as_mut() else {
            return;
        };

        let turns_before = active.combat_turns();
        active.encounter.update_encounter(time, delta, presenter);
        if active.combat_turns() > turns_before {
            self.effects.update_effects();
        }

        if active.encounter.state() == EncounterState::Resolution {
            let result = active.encounter.result();
            tracing::info!(%result, "encounter resolved");

            presenter.show_encounter_result(result);
            self.completed.push(active.encounter.behavior().label());
            if result == EncounterResult::Victory {
                presenter.full_heal_player();
            }
            active.encounter.complete(presenter);
            self.caster.end();
        }
    }

    /// Forwards a resolved spell cast to the held encounter.
    ///
    /// Returns true if the encounter applied it.
    pub fn handle_player_spell(
        &mut self,
        cast: &SpellCastResult,
        presenter: &mut dyn Presenter,
    ) -> bool {
        match self.current.as_mut() {
            Some(active) => active.encounter.handle_player_spell(cast, presenter),
            None => false,
        }
    }

    /// Casts `recipe` with the manager's effect system and forwards the
    /// result.
    ///
    /// Returns `None` without casting if the held encounter would not accept
    /// a spell right now, so rejected casts never count toward the third
    /// slot unlock.
    pub fn cast_spell(
        &mut self,
        recipe: &SpellRecipe,
        timing_accuracy: f64,
        presenter: &mut dyn Presenter,
    ) -> Option<SpellCastResult> {
        if !self.accepts_player_spell() {
            tracing::debug!(spell = %recipe.name, "no encounter accepting spells; cast dropped");
            return None;
        }

        let cast = self.effects.cast_spell(recipe, timing_accuracy);
        if cast.slot_unlocked {
            presenter.unlock_third_slot();
        }
        self.handle_player_spell(&cast, presenter);
        Some(cast)
    }

    // =========================================================================
    // Timed casting
    // =========================================================================

    /// Starts the spell arrow over `recipes`, one slot each.
    ///
    /// Returns false when nothing is held that would accept a spell, or when
    /// `recipes` is empty.
    pub fn begin_spell_selection(&mut self, recipes: Vec<SpellRecipe>) -> bool {
        if !self.accepts_player_spell() {
            return false;
        }
        self.caster.begin(recipes)
    }

    /// Buffers a confirm press at `now_ms`.
    pub fn press_confirm(&mut self, now_ms: u64) {
        self.caster.press(now_ms);
    }

    /// Handles a buffered confirm press and casts the spell under the arrow.
    ///
    /// Returns `None` without casting when no press is buffered, when the
    /// arrow is in a buffer zone, or when the held encounter would not accept
    /// a spell. A press left unhandled because the encounter is busy stays
    /// buffered until it expires.
    pub fn confirm_timing(
        &mut self,
        now_ms: u64,
        presenter: &mut dyn Presenter,
    ) -> Option<(SelectedSpell, SpellCastResult)> {
        if !self.accepts_player_spell() {
            return None;
        }
        let selected = self.caster.confirm(now_ms)?;
        let cast = self.cast_spell(&selected.recipe, selected.timing.accuracy, presenter)?;
        Some((selected, cast))
    }

    fn accepts_player_spell(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|active| active.encounter.accepts_player_spell())
    }

    /// The host dismissed the result window.
    ///
    /// Clears the slot, then reports a won map encounter, starts the next
    /// queued encounter, or signals that the run is over.
    ///
    /// # Errors
    ///
    /// Returns the construction error of the next queued encounter.
    pub fn on_encounter_result_closed(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        let Some(active) = self.current.as_ref() else {
            tracing::debug!("result closed with no encounter held");
            return Ok(());
        };
        if active.encounter.state() != EncounterState::Complete {
            tracing::warn!(
                state = ?active.encounter.state(),
                "result closed before encounter finished"
            );
            return Ok(());
        }

        let result = active.encounter.result();
        let was_map = self.is_map_encounter;
        self.current = None;
        self.is_active = false;
        self.is_map_encounter = false;

        if was_map && result == EncounterResult::Victory {
            tracing::info!("map encounter completed");
            presenter.map_encounter_complete();
            return Ok(());
        }

        if self.queue.is_empty() {
            tracing::info!(completed = self.completed.len(), "all encounters completed");
            presenter.return_to_normal_state();
            Ok(())
        } else {
            self.start_next_encounter(presenter)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The held encounter, if any.
    #[must_use]
    pub fn current_encounter(&self) -> Option<&Encounter<EncounterKind>> {
        self.current.as_ref().map(|active| &active.encounter)
    }

    /// The plan of the held encounter.
    #[must_use]
    pub fn current_plan(&self) -> Option<&EncounterConfig> {
        self.current.as_ref().map(|active| &active.plan)
    }

    /// Whether an encounter is held, including one showing its result.
    #[must_use]
    pub fn is_encounter_active(&self) -> bool {
        self.is_active
    }

    /// Whether the held encounter was launched from the map.
    #[must_use]
    pub fn is_map_encounter(&self) -> bool {
        self.is_map_encounter
    }

    /// Labels of resolved encounters, in order.
    #[must_use]
    pub fn completed_encounters(&self) -> &[String] {
        &self.completed
    }

    /// Number of queued plans.
    #[must_use]
    pub fn remaining_encounters(&self) -> usize {
        self.queue.len()
    }

    /// The enemy intent hint, during combat.
    #[must_use]
    pub fn enemy_action_hint(&self) -> Option<&str> {
        self.current
            .as_ref()?
            .encounter
            .behavior()
            .as_combat()?
            .enemy_action_hint()
    }

    /// Exact description of the enemy's committed action, during combat.
    #[must_use]
    pub fn enemy_action_text(&self) -> Option<&'static str> {
        self.current
            .as_ref()?
            .encounter
            .behavior()
            .as_combat()?
            .enemy_action_text()
    }

    /// The timed-cast pipeline.
    #[must_use]
    pub fn spell_caster(&self) -> &SpellCaster {
        &self.caster
    }

    /// The spell effect system.
    #[must_use]
    pub fn effects(&self) -> &SpellEffectsSystem {
        &self.effects
    }

    /// The enemy registry.
    #[must_use]
    pub fn enemies(&self) -> &EnemyRegistry {
        &self.enemies
    }

    /// The hazard table.
    #[must_use]
    pub fn hazards(&self) -> &HazardTable {
        &self.hazards
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
