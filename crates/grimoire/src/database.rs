//! Spell recipe registry.
//!
//! The registry is built once at startup and shared read-only by the systems
//! that need it. The only mutation after construction is discovering a recipe.
//!
//! # Matching
//!
//! Recipe matching is multiset containment: order is irrelevant and each
//! required material must be matched by a distinct available material.
//!
//! ```
//! use grimoire::{MaterialKind, SpellDatabase};
//!
//! let fire_leaf = [MaterialKind::Leaf, MaterialKind::Fire];
//! assert!(SpellDatabase::can_cast_spell(&[MaterialKind::Fire, MaterialKind::Leaf], &fire_leaf));
//! assert!(!SpellDatabase::can_cast_spell(&[MaterialKind::Fire, MaterialKind::Fire], &fire_leaf));
//! ```

use std::collections::HashMap;

use crate::error::{GrimoireError, Result};
use crate::material::MaterialKind;
use crate::recipe::{Difficulty, EffectArea, EffectKind, SpellEffect, SpellRecipe};

/// Recipes with more materials than this are defined but kept out of selection pools.
pub const MAX_SELECTABLE_MATERIALS: usize = 2;

/// Registry of spell recipes keyed by id, iterated in registration order.
#[derive(Debug, Clone, Default)]
pub struct SpellDatabase {
    recipes: Vec<SpellRecipe>,
    index: HashMap<String, usize>,
}

impl SpellDatabase {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the registry with the full standard recipe book.
    #[must_use]
    pub fn standard() -> Self {
        use MaterialKind::{Fire, Leaf, Rock};

        let mut db = Self::new();

        // Single-material spells
        db.add_recipe(recipe(
            "ember",
            "Ember",
            "A small flame that burns the enemy",
            &[Fire],
            Difficulty::Easy,
            SpellEffect::new(EffectKind::Damage, 25, "25 damage"),
        ));
        db.add_recipe(recipe(
            "vigor",
            "Vigor",
            "Nature's empowering energy",
            &[Leaf],
            Difficulty::Easy,
            SpellEffect::new(EffectKind::Healing, 20, "20 healing"),
        ));
        db.add_recipe(recipe(
            "shard",
            "Shard",
            "A jagged stone that deals damage and provides defense",
            &[Rock],
            Difficulty::Easy,
            SpellEffect::new(EffectKind::Damage, 15, "15 damage + 15 defense").with_defense(15),
        ));

        // Two of the same material
        db.add_recipe(recipe(
            "strong_ember",
            "Strong Ember",
            "An intense flame that burns brighter",
            &[Fire, Fire],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Damage, 50, "50 damage"),
        ));
        db.add_recipe(recipe(
            "strong_vigor",
            "Strong Vigor",
            "Potent empowerment from concentrated nature",
            &[Leaf, Leaf],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Healing, 40, "40 healing"),
        ));
        db.add_recipe(recipe(
            "strong_shard",
            "Strong Shard",
            "Enhanced stone projectile that deals damage and provides defense",
            &[Rock, Rock],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Damage, 15, "15 damage + 15 defense").with_defense(15),
        ));

        // Two different materials
        db.add_recipe(recipe(
            "smoke_cloud",
            "Smoke Cloud",
            "Fire and leaf create confusing smoke",
            &[Fire, Leaf],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Damage, 25, "25 damage + 20 healing").with_duration(1),
        ));
        db.add_recipe(recipe(
            "molten_shard",
            "Molten Shard",
            "Fire-heated rock that weakens enemies",
            &[Fire, Rock],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Damage, 35, "35 damage + 15 defense").with_duration(2),
        ));
        db.add_recipe(recipe(
            "healing_stone",
            "Healing Stone",
            "Earth-infused with nature's restorative power",
            &[Leaf, Rock],
            Difficulty::Medium,
            SpellEffect::new(EffectKind::Healing, 30, "10 damage + 20 healing + 15 defense"),
        ));

        // Three materials, defined but not selectable yet
        db.add_recipe(recipe(
            "inferno",
            "Inferno",
            "Ultimate fire magic consuming all elements",
            &[Fire, Fire, Fire],
            Difficulty::Hard,
            SpellEffect::new(EffectKind::Damage, 75, "75 damage").with_area(EffectArea::Large),
        ));
        db.add_recipe(recipe(
            "elemental_storm",
            "Elemental Storm",
            "All three elements unite in devastating harmony",
            &[Fire, Leaf, Rock],
            Difficulty::Hard,
            SpellEffect::new(EffectKind::Damage, 25, "25 damage + 20 healing")
                .with_duration(1)
                .with_area(EffectArea::Large),
        ));
        db.add_recipe(recipe(
            "sanctuary",
            "Sanctuary",
            "Nature and earth create an impenetrable refuge",
            &[Leaf, Rock, Leaf],
            Difficulty::Hard,
            SpellEffect::new(
                EffectKind::Defensive,
                8,
                "Gain 8 armor and immunity to debuffs for 3 turns",
            )
            .with_duration(3),
        ));

        // Zero-cost utility spell
        db.add_recipe(recipe(
            "gather",
            "Gather",
            "Collect materials from the environment",
            &[],
            Difficulty::Easy,
            SpellEffect::new(EffectKind::Utility, 5, "+5 materials"),
        ));

        db
    }

    /// Registers a recipe, replacing any recipe with the same id.
    pub fn add_recipe(&mut self, recipe: SpellRecipe) {
        if let Some(&slot) = self.index.get(&recipe.id) {
            self.recipes[slot] = recipe;
        } else {
            self.index.insert(recipe.id.clone(), self.recipes.len());
            self.recipes.push(recipe);
        }
    }

    /// Looks up a recipe by id.
    #[must_use]
    pub fn recipe(&self, id: &str) -> Option<&SpellRecipe> {
        self.index.get(id).map(|&slot| &self.recipes[slot])
    }

    /// Looks up a recipe by id, failing with [`GrimoireError::UnknownRecipe`].
    ///
    /// # Errors
    ///
    /// Returns an error if no recipe is registered under `id`.
    pub fn require(&self, id: &str) -> Result<&SpellRecipe> {
        self.recipe(id)
            .ok_or_else(|| GrimoireError::UnknownRecipe(id.to_string()))
    }

    /// All recipes in registration order.
    #[must_use]
    pub fn all_recipes(&self) -> &[SpellRecipe] {
        &self.recipes
    }

    /// Discovered recipes with at most two materials.
    ///
    /// Three-material recipes are excluded even when discovered.
    #[must_use]
    pub fn discovered_recipes(&self) -> Vec<&SpellRecipe> {
        self.recipes
            .iter()
            .filter(|r| r.discovered && r.material_count() <= MAX_SELECTABLE_MATERIALS)
            .collect()
    }

    /// Discovered recipes castable from `materials`.
    #[must_use]
    pub fn available_spells(&self, materials: &[MaterialKind]) -> Vec<&SpellRecipe> {
        self.discovered_recipes()
            .into_iter()
            .filter(|r| Self::can_cast_spell(&r.materials, materials))
            .collect()
    }

    /// Multiset containment of `required` in `available`.
    ///
    /// An empty requirement is always castable.
    #[must_use]
    pub fn can_cast_spell(required: &[MaterialKind], available: &[MaterialKind]) -> bool {
        if required.is_empty() {
            return true;
        }
        if required.len() > available.len() {
            return false;
        }

        let mut remaining = available.to_vec();
        for material in required {
            match remaining.iter().position(|m| m == material) {
                Some(pos) => {
                    remaining.swap_remove(pos);
                }
                None => return false,
            }
        }
        true
    }

    /// Marks a recipe as discovered. Returns `true` only if the flag flipped.
    pub fn discover_recipe(&mut self, id: &str) -> bool {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };
        let recipe = &mut self.recipes[slot];
        if recipe.discovered {
            return false;
        }
        recipe.discovered = true;
        tracing::info!(recipe = id, "recipe discovered");
        true
    }

    /// Finds the discovered recipe whose materials equal `materials` as a multiset.
    #[must_use]
    pub fn find_recipe_by_materials(&self, materials: &[MaterialKind]) -> Option<&SpellRecipe> {
        let mut wanted = materials.to_vec();
        wanted.sort_unstable();

        self.discovered_recipes().into_iter().find(|r| {
            let mut have = r.materials.clone();
            have.sort_unstable();
            have == wanted
        })
    }

    /// Timing window size for a difficulty tier.
    #[must_use]
    pub fn timing_window_size(difficulty: Difficulty) -> u32 {
        difficulty.timing_window_size()
    }
}

fn recipe(
    id: &str,
    name: &str,
    description: &str,
    materials: &[MaterialKind],
    difficulty: Difficulty,
    effect: SpellEffect,
) -> SpellRecipe {
    SpellRecipe {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        materials: materials.to_vec(),
        difficulty,
        discovered: true,
        effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use MaterialKind::{Fire, Leaf, Rock};

    mod registry_tests {
        use super::*;

        #[test]
        fn standard_has_all_recipes() {
            let db = SpellDatabase::standard();
            assert_eq!(db.all_recipes().len(), 13);
            assert_eq!(db.all_recipes()[0].id, "ember");
            assert_eq!(db.all_recipes()[12].id, "gather");
        }

        #[test]
        fn require_unknown_recipe_errors() {
            let db = SpellDatabase::standard();
            assert_eq!(
                db.require("meteor"),
                Err(GrimoireError::UnknownRecipe("meteor".to_string()))
            );
            assert!(db.require("ember").is_ok());
        }

        #[test]
        fn add_recipe_replaces_same_id() {
            let mut db = SpellDatabase::standard();
            let mut ember = db.recipe("ember").unwrap().clone();
            ember.effect.value = 99;
            db.add_recipe(ember);

            assert_eq!(db.all_recipes().len(), 13);
            assert_eq!(db.recipe("ember").unwrap().effect.value, 99);
        }

        #[test]
        fn discover_recipe_flips_once() {
            let mut db = SpellDatabase::new();
            let mut hidden = recipe(
                "secret",
                "Secret",
                "",
                &[Fire],
                Difficulty::Easy,
                SpellEffect::new(EffectKind::Damage, 1, "1 damage"),
            );
            hidden.discovered = false;
            db.add_recipe(hidden);

            assert!(db.discovered_recipes().is_empty());
            assert!(db.discover_recipe("secret"));
            assert!(!db.discover_recipe("secret"));
            assert!(!db.discover_recipe("missing"));
            assert_eq!(db.discovered_recipes().len(), 1);
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn discovered_excludes_three_material_recipes() {
            let db = SpellDatabase::standard();
            let discovered = db.discovered_recipes();
            assert!(discovered.iter().all(|r| r.material_count() <= 2));
            assert!(!discovered.iter().any(|r| r.id == "inferno"));
            // inferno is flagged discovered but still excluded
            assert!(db.recipe("inferno").unwrap().discovered);
        }

        #[test]
        fn available_spells_for_fire_leaf() {
            let db = SpellDatabase::standard();
            let ids: Vec<_> = db
                .available_spells(&[Fire, Leaf])
                .into_iter()
                .map(|r| r.id.as_str())
                .collect();
            assert_eq!(ids, vec!["ember", "vigor", "smoke_cloud", "gather"]);
        }

        #[test]
        fn available_spells_with_no_materials_is_gather() {
            let db = SpellDatabase::standard();
            let spells = db.available_spells(&[]);
            assert_eq!(spells.len(), 1);
            assert_eq!(spells[0].id, "gather");
        }

        #[test]
        fn find_recipe_ignores_order() {
            let db = SpellDatabase::standard();
            assert_eq!(
                db.find_recipe_by_materials(&[Rock, Fire]).map(|r| r.id.as_str()),
                Some("molten_shard")
            );
            assert!(db.find_recipe_by_materials(&[Fire, Fire, Fire]).is_none());
        }
    }

    mod can_cast_tests {
        use super::*;

        #[test]
        fn empty_requirement_always_castable() {
            assert!(SpellDatabase::can_cast_spell(&[], &[]));
        }

        #[test]
        fn more_required_than_available() {
            assert!(!SpellDatabase::can_cast_spell(&[Fire, Fire], &[Fire]));
        }

        #[test]
        fn duplicates_must_each_match() {
            assert!(SpellDatabase::can_cast_spell(&[Fire, Fire], &[Fire, Leaf, Fire]));
            assert!(!SpellDatabase::can_cast_spell(&[Fire, Fire], &[Fire, Leaf, Rock]));
        }

        fn material() -> impl Strategy<Value = MaterialKind> {
            prop_oneof![Just(Fire), Just(Leaf), Just(Rock)]
        }

        fn count(list: &[MaterialKind], kind: MaterialKind) -> usize {
            list.iter().filter(|m| **m == kind).count()
        }

        proptest! {
            #[test]
            fn matches_multiset_subset(
                required in proptest::collection::vec(material(), 0..4),
                available in proptest::collection::vec(material(), 0..5),
            ) {
                let expected = MaterialKind::ALL
                    .iter()
                    .all(|&k| count(&required, k) <= count(&available, k));
                prop_assert_eq!(SpellDatabase::can_cast_spell(&required, &available), expected);
            }

            #[test]
            fn order_independent(
                required in proptest::collection::vec(material(), 0..4),
                available in proptest::collection::vec(material(), 0..5),
            ) {
                let mut reversed = available.clone();
                reversed.reverse();
                prop_assert_eq!(
                    SpellDatabase::can_cast_spell(&required, &available),
                    SpellDatabase::can_cast_spell(&required, &reversed)
                );
            }
        }
    }
}
