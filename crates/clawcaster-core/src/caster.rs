//! The timing cast: from a confirm press to a resolved spell.
//!
//! A [`SpellCaster`] owns the three pieces the player interacts with while
//! choosing a spell: the sweeping [`SpellArrow`], the [`TimingSelector`] over
//! the candidate recipes, and the [`InputBuffer`] that holds confirm presses.
//!
//! ```text
//! press ──► buffer ──► consume ──► arrow slot? ──► timing result
//!                                      │
//!                                      └─ buffer zone: no spell
//! ```
//!
//! A press that lands while the arrow is in a buffer zone is consumed and
//! selects nothing; the sweep keeps running so the player can try again.

use grimoire::{ArrowConfig, SpellArrow, SpellRecipe, TimingResult, TimingSelector};

use crate::config::InputConfig;
use crate::input::{InputBuffer, InputKind};

/// A spell picked by a confirm press.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSpell {
    /// Slot the arrow indicated.
    pub index: usize,
    /// Recipe in that slot.
    pub recipe: SpellRecipe,
    /// Where the press landed on the slot's timing bar.
    pub timing: TimingResult,
}

/// Arrow, timing bars and confirm input for one spell selection.
///
/// # Example
///
/// ```
/// use clawcaster_core::{InputConfig, SpellCaster};
/// use clawcaster_core::grimoire::{ArrowConfig, SpellDatabase};
///
/// let db = SpellDatabase::standard();
/// let mut caster = SpellCaster::new(ArrowConfig::default(), InputConfig::default());
/// caster.begin(db.discovered_recipes().into_iter().take(3).cloned().collect());
///
/// // The sweep starts in the middle slot.
/// caster.press(0);
/// let selected = caster.confirm(0).unwrap();
/// assert_eq!(selected.index, 1);
/// assert!(!caster.is_selecting());
/// ```
#[derive(Debug, Clone)]
pub struct SpellCaster {
    arrow: SpellArrow,
    selector: TimingSelector,
    input: InputBuffer,
}

impl SpellCaster {
    /// Creates an idle caster.
    #[must_use]
    pub fn new(arrow: ArrowConfig, input: InputConfig) -> Self {
        Self {
            arrow: SpellArrow::new(arrow),
            selector: TimingSelector::new(arrow),
            input: InputBuffer::new(input),
        }
    }

    /// Starts the sweep over `recipes`, one slot each.
    ///
    /// Stale presses are dropped so an early press cannot select anything.
    /// Returns false and stays idle when there is nothing to choose from.
    pub fn begin(&mut self, recipes: Vec<SpellRecipe>) -> bool {
        if recipes.is_empty() {
            return false;
        }
        self.arrow.set_spell_count(recipes.len());
        self.arrow.start_selection();
        self.selector.start(recipes);
        self.input.clear();
        self.input.unblock();
        true
    }

    /// Stops the sweep and ignores further presses until the next `begin`.
    pub fn end(&mut self) {
        self.arrow.stop_selection();
        self.selector.stop();
        self.input.block();
    }

    /// Whether a sweep is running.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selector.is_active()
    }

    /// Advances the sweep. Call once per frame.
    pub fn advance(&mut self, delta_ms: f64) {
        self.arrow.advance(delta_ms);
    }

    /// Buffers a confirm press at `now` ms.
    pub fn press(&mut self, now: u64) {
        self.input.press(now);
    }

    /// Buffers a confirm release at `now` ms.
    pub fn release(&mut self, now: u64) {
        self.input.release(now);
    }

    /// Whether a confirm press is waiting to be handled.
    #[must_use]
    pub fn has_pending_press(&self) -> bool {
        self.input.has_unprocessed(InputKind::Press)
    }

    /// Handles the oldest buffered press.
    ///
    /// Returns `None` when no press is buffered, no sweep is running, or the
    /// arrow sits in a buffer zone. A press is consumed in every case but the
    /// first. On a selection the sweep ends.
    pub fn confirm(&mut self, now: u64) -> Option<SelectedSpell> {
        self.input.update(now);
        if !self.is_selecting() {
            return None;
        }
        self.input.consume(InputKind::Press)?;

        let timing = self.selector.select_at(&self.arrow)?;
        let index = self.arrow.current_spell_index()?;
        let recipe = self.selector.current_recipe()?.clone();
        tracing::debug!(
            spell = %recipe.id,
            index,
            quality = %timing.quality,
            accuracy = timing.accuracy,
            "spell selected"
        );
        self.end();
        Some(SelectedSpell {
            index,
            recipe,
            timing,
        })
    }

    /// The sweeping arrow.
    #[must_use]
    pub fn arrow(&self) -> &SpellArrow {
        &self.arrow
    }

    /// The timing selector.
    #[must_use]
    pub fn selector(&self) -> &TimingSelector {
        &self.selector
    }

    /// The confirm input buffer.
    #[must_use]
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }
}
