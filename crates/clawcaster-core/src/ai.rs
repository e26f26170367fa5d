//! Enemy decision making and intent hints.
//!
//! The enemy picks its next action by roulette-wheel selection over the
//! actions that are off cooldown. Base weights come from a per-enemy profile.
//! BLOCK and PARRY gain a flat bonus while the enemy is wounded.
//!
//! The intent hint shown to the player is deliberately unreliable. A first
//! roll against the enemy's certainty decides whether the hint says anything
//! at all. A second roll picks an accuracy tier:
//!
//! | roll        | tier     | text                                  |
//! |-------------|----------|---------------------------------------|
//! | `< 0.30`    | accurate | names the committed action            |
//! | `< 0.70`    | vague    | truthful but indirect                 |
//! | `< 0.85`    | wrong    | names a different action              |
//! | otherwise   | flavor   | says nothing about the action         |

use bitflags::bitflags;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CombatConfig;
use crate::enemy::EnemyData;

/// An action the enemy can take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyAction {
    /// Regular attack for base damage.
    Attack,
    /// Attack for 1.5x base damage.
    HeavyAttack,
    /// Raises a guard.
    Block,
    /// Readies a counter.
    Parry,
}

impl EnemyAction {
    /// All actions, in roulette iteration order.
    pub const ALL: [Self; 4] = [Self::Attack, Self::HeavyAttack, Self::Block, Self::Parry];

    const fn index(self) -> usize {
        match self {
            Self::Attack => 0,
            Self::HeavyAttack => 1,
            Self::Block => 2,
            Self::Parry => 3,
        }
    }

    /// Exact description of the action.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::HeavyAttack => "Heavy Attack",
            Self::Block => "Block",
            Self::Parry => "Parry",
        }
    }

    /// Whether the action deals damage.
    #[must_use]
    pub fn is_attack(self) -> bool {
        matches!(self, Self::Attack | Self::HeavyAttack)
    }
}

impl fmt::Display for EnemyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

bitflags! {
    /// Defensive stance left by the enemy's last action.
    ///
    /// Bookkeeping only: incoming player damage does not consult it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EnemyStance: u8 {
        /// Set by BLOCK.
        const BLOCKING = 1 << 0;
        /// Set by PARRY.
        const PARRYING = 1 << 1;
    }
}

/// Per-action selection weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionWeights {
    /// Weight of ATTACK.
    pub attack: f64,
    /// Weight of HEAVY_ATTACK.
    pub heavy_attack: f64,
    /// Weight of BLOCK.
    pub block: f64,
    /// Weight of PARRY.
    pub parry: f64,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            attack: 25.0,
            heavy_attack: 25.0,
            block: 25.0,
            parry: 25.0,
        }
    }
}

impl ActionWeights {
    /// Profile for an enemy id; unknown ids get the flat default.
    #[must_use]
    pub fn for_enemy(enemy_id: &str) -> Self {
        let (attack, heavy_attack, block, parry) = match enemy_id {
            "lizard" => (50.0, 25.0, 15.0, 10.0),
            "fox" => (30.0, 15.0, 20.0, 35.0),
            "crane" => (35.0, 35.0, 20.0, 10.0),
            _ => return Self::default(),
        };
        Self {
            attack,
            heavy_attack,
            block,
            parry,
        }
    }

    /// Weight of one action.
    #[must_use]
    pub fn get(&self, action: EnemyAction) -> f64 {
        match action {
            EnemyAction::Attack => self.attack,
            EnemyAction::HeavyAttack => self.heavy_attack,
            EnemyAction::Block => self.block,
            EnemyAction::Parry => self.parry,
        }
    }

    /// Copy with BLOCK and PARRY raised by `bonus`.
    #[must_use]
    pub fn with_defense_bonus(mut self, bonus: f64) -> Self {
        self.block += bonus;
        self.parry += bonus;
        self
    }
}

/// Remaining cooldown turns per action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    turns: [u32; 4],
}

impl Cooldowns {
    /// All actions ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns left before `action` is ready.
    #[must_use]
    pub fn remaining(&self, action: EnemyAction) -> u32 {
        self.turns[action.index()]
    }

    /// Whether `action` can be chosen.
    #[must_use]
    pub fn is_ready(&self, action: EnemyAction) -> bool {
        self.remaining(action) == 0
    }

    /// Puts `action` on cooldown for `turns` turns.
    pub fn set(&mut self, action: EnemyAction, turns: u32) {
        self.turns[action.index()] = turns;
    }

    /// Advances every cooldown by one turn.
    pub fn tick(&mut self) {
        for turns in &mut self.turns {
            *turns = turns.saturating_sub(1);
        }
    }

    /// Cooldown the action imposes on itself.
    #[must_use]
    pub fn cost(action: EnemyAction, config: &CombatConfig) -> u32 {
        match action {
            EnemyAction::Attack => 0,
            EnemyAction::HeavyAttack => config.heavy_attack_cooldown,
            EnemyAction::Block => config.block_cooldown,
            EnemyAction::Parry => config.parry_cooldown,
        }
    }
}

/// First-fit roulette over `candidates` with a draw `roll` in `[0, total)`.
///
/// Weights are subtracted in order and the first action that drives the
/// remainder non-positive wins. Falls back to the last candidate if rounding
/// leaves a positive remainder.
#[must_use]
pub fn roulette(candidates: &[(EnemyAction, f64)], roll: f64) -> Option<EnemyAction> {
    let mut remaining = roll;
    for &(action, weight) in candidates {
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(action);
        }
    }
    candidates.last().map(|&(action, _)| action)
}

/// Chooses the enemy's next action.
///
/// Actions on cooldown and actions with non-positive weight are excluded.
/// Returns ATTACK if nothing is eligible.
pub fn choose_action<R: Rng + ?Sized>(
    weights: &ActionWeights,
    cooldowns: &Cooldowns,
    health_fraction: f64,
    config: &CombatConfig,
    rng: &mut R,
) -> EnemyAction {
    let weights = if health_fraction < config.wounded_threshold {
        weights.with_defense_bonus(config.wounded_defense_bonus)
    } else {
        *weights
    };

    let candidates: Vec<(EnemyAction, f64)> = EnemyAction::ALL
        .iter()
        .filter(|&&action| cooldowns.is_ready(action))
        .map(|&action| (action, weights.get(action)))
        .filter(|&(_, weight)| weight > 0.0)
        .collect();

    let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        return EnemyAction::Attack;
    }

    let roll = rng.gen_range(0.0..total);
    roulette(&candidates, roll).unwrap_or(EnemyAction::Attack)
}

fn accurate_hint(action: EnemyAction, name: &str) -> String {
    match action {
        EnemyAction::Attack => format!("{name} is preparing to attack!"),
        EnemyAction::HeavyAttack => format!("{name} is winding up a powerful blow!"),
        EnemyAction::Block => format!("{name} is raising its guard."),
        EnemyAction::Parry => format!("{name} is watching your movements, ready to counter."),
    }
}

fn vague_hint(action: EnemyAction, name: &str) -> String {
    match action {
        EnemyAction::Attack => format!("{name} looks aggressive."),
        EnemyAction::HeavyAttack => format!("{name} is gathering its strength..."),
        EnemyAction::Block => format!("{name} seems cautious."),
        EnemyAction::Parry => format!("{name} shifts its stance..."),
    }
}

const FLAVOR_HINTS: [&str; 3] = [
    "{name} growls menacingly.",
    "{name} circles slowly.",
    "{name} stares you down.",
];

/// Generates the intent hint for a committed action.
///
/// Draws two or three values from `rng`: the certainty roll, then (if
/// certain) the tier roll, then one more for wrong and flavor hints.
pub fn action_hint<R: Rng + ?Sized>(action: EnemyAction, enemy: &EnemyData, rng: &mut R) -> String {
    let name = enemy.display_name.as_str();

    if rng.gen::<f64>() >= enemy.difficulty.hint_certainty() {
        return format!("{name}'s intentions are unclear.");
    }

    let tier = rng.gen::<f64>();
    if tier < 0.30 {
        accurate_hint(action, name)
    } else if tier < 0.70 {
        vague_hint(action, name)
    } else if tier < 0.85 {
        let others: Vec<EnemyAction> = EnemyAction::ALL
            .iter()
            .copied()
            .filter(|&a| a != action)
            .collect();
        let decoy = others[rng.gen_range(0..others.len())];
        accurate_hint(decoy, name)
    } else {
        let line = FLAVOR_HINTS[rng.gen_range(0..FLAVOR_HINTS.len())];
        line.replace("{name}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyRegistry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod roulette_tests {
        use super::*;

        const WHEEL: [(EnemyAction, f64); 3] = [
            (EnemyAction::Attack, 50.0),
            (EnemyAction::Block, 30.0),
            (EnemyAction::Parry, 20.0),
        ];

        #[test]
        fn first_fit_on_running_subtraction() {
            assert_eq!(roulette(&WHEEL, 0.0), Some(EnemyAction::Attack));
            assert_eq!(roulette(&WHEEL, 50.0), Some(EnemyAction::Attack));
            assert_eq!(roulette(&WHEEL, 50.5), Some(EnemyAction::Block));
            assert_eq!(roulette(&WHEEL, 80.0), Some(EnemyAction::Block));
            assert_eq!(roulette(&WHEEL, 99.9), Some(EnemyAction::Parry));
        }

        #[test]
        fn overshoot_falls_back_to_last() {
            assert_eq!(roulette(&WHEEL, 150.0), Some(EnemyAction::Parry));
        }

        #[test]
        fn empty_wheel_is_none() {
            assert_eq!(roulette(&[], 1.0), None);
        }
    }

    mod choose_action_tests {
        use super::*;

        #[test]
        fn cooldown_excludes_action() {
            let config = CombatConfig::default();
            let weights = ActionWeights {
                attack: 0.0,
                heavy_attack: 100.0,
                block: 0.0,
                parry: 0.0,
            };
            let mut cooldowns = Cooldowns::new();
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            assert_eq!(
                choose_action(&weights, &cooldowns, 1.0, &config, &mut rng),
                EnemyAction::HeavyAttack
            );

            cooldowns.set(EnemyAction::HeavyAttack, 2);
            assert_eq!(
                choose_action(&weights, &cooldowns, 1.0, &config, &mut rng),
                EnemyAction::Attack
            );
        }

        #[test]
        fn wounded_enemy_can_defend_with_zero_base_weight() {
            let config = CombatConfig::default();
            let weights = ActionWeights {
                attack: 0.0,
                heavy_attack: 0.0,
                block: 0.0,
                parry: 0.0,
            };
            let cooldowns = Cooldowns::new();
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            for _ in 0..20 {
                let action = choose_action(&weights, &cooldowns, 0.1, &config, &mut rng);
                assert!(matches!(action, EnemyAction::Block | EnemyAction::Parry));
            }
            assert_eq!(
                choose_action(&weights, &cooldowns, 0.5, &config, &mut rng),
                EnemyAction::Attack
            );
        }

        #[test]
        fn profiles_differ_by_enemy() {
            assert_eq!(ActionWeights::for_enemy("lizard").attack, 50.0);
            assert_eq!(ActionWeights::for_enemy("fox").parry, 35.0);
            assert_eq!(ActionWeights::for_enemy("shadow_wolf"), ActionWeights::default());
        }
    }

    #[test]
    fn cooldowns_tick_to_zero() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.set(EnemyAction::Parry, 2);
        cooldowns.tick();
        assert_eq!(cooldowns.remaining(EnemyAction::Parry), 1);
        cooldowns.tick();
        cooldowns.tick();
        assert!(cooldowns.is_ready(EnemyAction::Parry));
    }

    #[test]
    fn stance_flags_combine() {
        let mut stance = EnemyStance::empty();
        stance.insert(EnemyStance::BLOCKING);
        assert!(stance.contains(EnemyStance::BLOCKING));
        assert!(!stance.contains(EnemyStance::PARRYING));
        stance.remove(EnemyStance::BLOCKING);
        assert!(stance.is_empty());
    }

    mod hint_tests {
        use super::*;

        #[test]
        fn hints_name_the_enemy() {
            let registry = EnemyRegistry::standard();
            let lizard = registry.get("lizard").unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            for action in EnemyAction::ALL {
                let hint = action_hint(action, lizard, &mut rng);
                assert!(hint.contains("Swamp Lizard"), "{hint}");
            }
        }

        #[test]
        fn hint_tiers_all_occur() {
            let registry = EnemyRegistry::standard();
            let lizard = registry.get("lizard").unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(17);

            let accurate = accurate_hint(EnemyAction::Attack, &lizard.display_name);
            let vague = vague_hint(EnemyAction::Attack, &lizard.display_name);
            let unclear = format!("{}'s intentions are unclear.", lizard.display_name);

            let hints: Vec<String> = (0..500)
                .map(|_| action_hint(EnemyAction::Attack, lizard, &mut rng))
                .collect();
            assert!(hints.contains(&accurate));
            assert!(hints.contains(&vague));
            assert!(hints.contains(&unclear));
            assert!(hints.iter().any(|h| *h != accurate && *h != vague && *h != unclear));
        }

        #[test]
        fn hard_enemies_are_less_certain() {
            let registry = EnemyRegistry::standard();
            let count_unclear = |id: &str| {
                let enemy = registry.get(id).unwrap();
                let unclear = format!("{}'s intentions are unclear.", enemy.display_name);
                let mut rng = ChaCha8Rng::seed_from_u64(23);
                (0..1000)
                    .filter(|_| action_hint(EnemyAction::Block, enemy, &mut rng) == unclear)
                    .count()
            };
            assert!(count_unclear("shadow_wolf") > count_unclear("lizard"));
        }
    }
}
