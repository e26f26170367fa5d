//! Recipe hints for the material-selection screen.

use serde::Serialize;

use crate::database::{SpellDatabase, MAX_SELECTABLE_MATERIALS};
use crate::material::MaterialKind;
use crate::recipe::SpellRecipe;

/// One line of the hint list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeHint {
    /// Text shown to the player.
    pub description: String,
    /// The recipe's materials.
    pub materials: Vec<MaterialKind>,
    /// Recipe id.
    pub recipe_id: String,
    /// Whether the recipe is discovered and selectable.
    pub is_discovered: bool,
    /// Whether the current materials can cast it.
    pub is_available: bool,
}

/// Materials from `required` that `available` cannot cover, in `required` order.
#[must_use]
pub fn missing_materials(
    required: &[MaterialKind],
    available: &[MaterialKind],
) -> Vec<MaterialKind> {
    let mut remaining = available.to_vec();
    let mut missing = Vec::new();
    for material in required {
        match remaining.iter().position(|m| m == material) {
            Some(pos) => {
                remaining.swap_remove(pos);
            }
            None => missing.push(*material),
        }
    }
    missing
}

fn cryptic_hint(recipe: &SpellRecipe) -> &'static str {
    match recipe.id.as_str() {
        "strong_ember" => "??? Twin flames burn twice as bright...",
        "strong_vigor" => "??? Double nature's bounty...",
        "strong_shard" => "??? Two stones, stronger foundation...",
        "smoke_cloud" => "??? When fire meets leaf, concealment follows...",
        "molten_shard" => "??? Heat transforms earth...",
        "healing_stone" => "??? Nature's touch upon solid ground...",
        "inferno" => "??? Triple flames become an inferno...",
        "elemental_storm" => "??? All elements united in harmony...",
        "sanctuary" => "??? Nature and earth create sanctuary...",
        _ => match recipe.material_count() {
            0 | 1 => "??? A simple combination awaits...",
            2 => "??? Two elements seek unity...",
            _ => "??? Advanced magic requires mastery...",
        },
    }
}

fn describe(recipe: &SpellRecipe, materials: &[MaterialKind], is_discovered: bool) -> String {
    if !is_discovered {
        return cryptic_hint(recipe).to_string();
    }
    if SpellDatabase::can_cast_spell(&recipe.materials, materials) {
        return format!("✓ {}: {}", recipe.name, recipe.effect.description);
    }
    let needed = missing_materials(&recipe.materials, materials)
        .iter()
        .map(|m| m.display_name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Need: {needed} → {}", recipe.name)
}

/// Builds hints for every recipe of at most two materials.
///
/// Sorted available first, then discovered, then by material count.
#[must_use]
pub fn generate_hints(db: &SpellDatabase, materials: &[MaterialKind]) -> Vec<RecipeHint> {
    let discovered = db.discovered_recipes();

    let mut hints: Vec<RecipeHint> = db
        .all_recipes()
        .iter()
        .filter(|r| r.material_count() <= MAX_SELECTABLE_MATERIALS)
        .map(|recipe| {
            let is_discovered = discovered.iter().any(|d| d.id == recipe.id);
            RecipeHint {
                description: describe(recipe, materials, is_discovered),
                materials: recipe.materials.clone(),
                recipe_id: recipe.id.clone(),
                is_discovered,
                is_available: SpellDatabase::can_cast_spell(&recipe.materials, materials),
            }
        })
        .collect();

    // stable sort keeps registration order within ties
    hints.sort_by_key(|h| (!h.is_available, !h.is_discovered, h.materials.len()));
    hints
}
