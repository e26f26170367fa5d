//! Spell materials and the slots that hold them.
//!
//! Materials are collected by the claw-crane minigame and dropped into a small
//! number of slots. The filled slots form the multiset that recipe matching
//! runs against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three symbolic material kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Fire material, drives damage spells.
    Fire,
    /// Leaf material, drives healing spells.
    Leaf,
    /// Rock material, drives defensive spells.
    Rock,
}

impl MaterialKind {
    /// All material kinds in declaration order.
    pub const ALL: [MaterialKind; 3] = [Self::Fire, Self::Leaf, Self::Rock];

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Leaf => "Leaf",
            Self::Rock => "Rock",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Default number of material slots before the third slot is unlocked.
pub const BASE_SLOT_COUNT: usize = 2;

/// Slot count after the third-slot unlock.
pub const MAX_SLOT_COUNT: usize = 3;

/// Fixed-capacity material slots.
///
/// Out-of-range or empty-slot accesses return `None`/`false` rather than
/// failing.
///
/// # Example
///
/// ```
/// use grimoire::{MaterialKind, MaterialSlots};
///
/// let mut slots = MaterialSlots::new();
/// assert!(slots.add(MaterialKind::Fire));
/// assert!(slots.add(MaterialKind::Rock));
/// assert!(!slots.add(MaterialKind::Leaf)); // full
///
/// assert_eq!(slots.remove(0), Some(MaterialKind::Fire));
/// assert_eq!(slots.remove(0), None);
/// assert_eq!(slots.remove(7), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSlots {
    slots: Vec<Option<MaterialKind>>,
}

impl MaterialSlots {
    /// Creates the default two empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; BASE_SLOT_COUNT],
        }
    }

    /// Number of slots, filled or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Places a material in the first empty slot. Returns `false` when full.
    pub fn add(&mut self, material: MaterialKind) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(material);
                true
            }
            None => false,
        }
    }

    /// Takes the material out of `index`.
    pub fn remove(&mut self, index: usize) -> Option<MaterialKind> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Material in `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MaterialKind> {
        self.slots.get(index).copied().flatten()
    }

    /// Filled materials in slot order.
    #[must_use]
    pub fn filled(&self) -> Vec<MaterialKind> {
        self.slots.iter().flatten().copied().collect()
    }

    /// True when every slot holds a material.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// True when no slot holds a material.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of filled slots.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Adds the third slot. Returns `true` only the first time.
    pub fn unlock_third_slot(&mut self) -> bool {
        if self.slots.len() >= MAX_SLOT_COUNT {
            return false;
        }
        self.slots.push(None);
        tracing::info!(capacity = self.slots.len(), "third material slot unlocked");
        true
    }
}

impl Default for MaterialSlots {
    fn default() -> Self {
        Self::new()
    }
}
