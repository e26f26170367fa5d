//! Timing windows and timing resolution.
//!
//! Every candidate spell slot owns a timing bar split into contiguous labeled
//! segments. When the player confirms, the arrow offset is converted into a
//! percentage along the bar of the slot the arrow indicates, and the segment
//! under that percentage decides the outcome.
//!
//! A resolved [`TimingResult`] carries both policies at once: the continuous
//! `accuracy` that feeds spell effectiveness, and the discrete segment
//! `quality` whose [`modifier`](TimingResult::modifier) is used for display.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arrow::{ArrowConfig, SpellArrow};
use crate::recipe::SpellRecipe;

/// Segment label within a timing bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingQuality {
    /// Sweet spot.
    Bonus,
    /// Ordinary hit.
    Normal,
    /// Penalty zone.
    Reduced,
}

impl TimingQuality {
    /// Display modifier for this segment.
    #[must_use]
    pub const fn modifier(self) -> f64 {
        match self {
            Self::Bonus => 1.2,
            Self::Normal => 1.0,
            Self::Reduced => 0.5,
        }
    }
}

impl fmt::Display for TimingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bonus => write!(f, "bonus"),
            Self::Normal => write!(f, "normal"),
            Self::Reduced => write!(f, "reduced"),
        }
    }
}

/// One segment of a timing bar, `[start_percent, end_percent)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingWindow {
    /// Inclusive start, 0..=100.
    pub start_percent: f64,
    /// Exclusive end, 0..=100.
    pub end_percent: f64,
    /// Segment label.
    pub quality: TimingQuality,
}

impl TimingWindow {
    const fn new(start_percent: f64, end_percent: f64, quality: TimingQuality) -> Self {
        Self {
            start_percent,
            end_percent,
            quality,
        }
    }

    /// Whether `percent` falls inside this segment.
    #[must_use]
    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.start_percent && percent < self.end_percent
    }
}

const CENTERED: [TimingWindow; 3] = [
    TimingWindow::new(0.0, 35.0, TimingQuality::Normal),
    TimingWindow::new(35.0, 65.0, TimingQuality::Bonus),
    TimingWindow::new(65.0, 100.0, TimingQuality::Normal),
];

const TWO_MATERIAL: [TimingWindow; 3] = [
    TimingWindow::new(0.0, 60.0, TimingQuality::Normal),
    TimingWindow::new(60.0, 75.0, TimingQuality::Bonus),
    TimingWindow::new(75.0, 100.0, TimingQuality::Reduced),
];

const THREE_MATERIAL: [TimingWindow; 4] = [
    TimingWindow::new(0.0, 15.0, TimingQuality::Normal),
    TimingWindow::new(15.0, 30.0, TimingQuality::Bonus),
    TimingWindow::new(30.0, 60.0, TimingQuality::Normal),
    TimingWindow::new(60.0, 100.0, TimingQuality::Reduced),
];

/// Timing bar segments for a recipe, chosen by material count.
#[must_use]
pub fn timing_windows(recipe: &SpellRecipe) -> &'static [TimingWindow] {
    match recipe.material_count() {
        0 | 1 => &CENTERED,
        2 => &TWO_MATERIAL,
        _ => &THREE_MATERIAL,
    }
}

/// A resolved timing press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    /// Segment the press landed in.
    pub quality: TimingQuality,
    /// Position along the bar, in percent. May lie outside 0..100.
    pub percent: f64,
    /// Closeness to the bar center, in `[0, 1]`.
    pub accuracy: f64,
}

impl TimingResult {
    /// Resolves a bar percentage against a set of segments.
    ///
    /// A percentage outside every segment counts as `Normal`.
    #[must_use]
    pub fn resolve(windows: &[TimingWindow], percent: f64) -> Self {
        let quality = windows
            .iter()
            .find(|w| w.contains(percent))
            .map_or(TimingQuality::Normal, |w| w.quality);

        Self {
            quality,
            percent,
            accuracy: (1.0 - (percent - 50.0).abs() / 50.0).clamp(0.0, 1.0),
        }
    }

    /// Display modifier derived from the segment.
    #[must_use]
    pub fn modifier(&self) -> f64 {
        self.quality.modifier()
    }
}

/// Maps arrow offsets to timing results for a list of candidate spells.
#[derive(Debug, Clone)]
pub struct TimingSelector {
    layout: ArrowConfig,
    recipes: Vec<SpellRecipe>,
    current: usize,
    active: bool,
}

impl TimingSelector {
    /// Creates an inactive selector using the arrow layout.
    #[must_use]
    pub fn new(layout: ArrowConfig) -> Self {
        Self {
            layout,
            recipes: Vec::new(),
            current: 0,
            active: false,
        }
    }

    /// Begins timing selection over `recipes`.
    pub fn start(&mut self, recipes: Vec<SpellRecipe>) {
        self.recipes = recipes;
        self.current = 0;
        self.active = true;
    }

    /// Ends timing selection.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Whether selection is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Candidate spells.
    #[must_use]
    pub fn recipes(&self) -> &[SpellRecipe] {
        &self.recipes
    }

    /// Points the selector at slot `index`. Out-of-range indices are ignored.
    pub fn set_current_spell(&mut self, index: usize) {
        if index < self.recipes.len() {
            self.current = index;
        }
    }

    /// The recipe in the indicated slot.
    #[must_use]
    pub fn current_recipe(&self) -> Option<&SpellRecipe> {
        self.recipes.get(self.current)
    }

    /// Percentage along the current slot's bar for an arrow offset.
    #[must_use]
    pub fn percent_for_offset(&self, offset: f64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let slot_center = self.current as f64 * self.layout.spell_spacing;
        let bar_top = slot_center - self.layout.bar_height / 2.0;
        (offset - bar_top) / self.layout.bar_height * 100.0
    }

    /// Resolves a confirm press with the arrow where it is now.
    ///
    /// Points the selector at the slot the arrow indicates and resolves the
    /// arrow's offset against it. Returns `None` when the arrow is inside a
    /// buffer zone or inactive, in which case the current slot is unchanged.
    pub fn select_at(&mut self, arrow: &SpellArrow) -> Option<TimingResult> {
        let Some(index) = arrow.current_spell_index() else {
            tracing::debug!(offset = arrow.offset(), "no spell selected");
            return None;
        };
        if index >= self.recipes.len() {
            return None;
        }
        self.current = index;
        self.select_current_spell(arrow.offset())
    }

    /// Resolves a confirm press at `offset` against the current slot.
    ///
    /// Does not consult the arrow, so the caller is responsible for the
    /// buffer zones; [`select_at`](Self::select_at) handles them.
    /// Returns `None` while inactive or when there is no current recipe.
    #[must_use]
    pub fn select_current_spell(&self, offset: f64) -> Option<TimingResult> {
        if !self.active {
            return None;
        }
        let recipe = self.current_recipe()?;
        let percent = self.percent_for_offset(offset);
        let result = TimingResult::resolve(timing_windows(recipe), percent);
        tracing::debug!(
            spell = %recipe.id,
            percent,
            quality = %result.quality,
            accuracy = result.accuracy,
            "timing resolved"
        );
        Some(result)
    }
}
