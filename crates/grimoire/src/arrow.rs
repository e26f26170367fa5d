//! The spell-selection arrow.
//!
//! Once spell selection begins, the arrow sweeps back and forth along the spell
//! list on a sine curve with a fixed angular speed, so its period does not
//! depend on player input. The sweep overshoots the first and last slot by a
//! buffer distance; while the arrow sits in a buffer no spell is selected.
//!
//! Positions are offsets in layout units relative to the first spell slot.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Layout and motion parameters for the arrow and timing bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Sweep speed in radians per second.
    pub angular_speed: f64,
    /// Distance between consecutive spell slots.
    pub spell_spacing: f64,
    /// Overshoot beyond the first and last slot.
    pub buffer: f64,
    /// Height of one spell's timing bar.
    pub bar_height: f64,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            // 0.02 rad per frame at 60 Hz
            angular_speed: 1.2,
            spell_spacing: 45.0,
            buffer: 30.0,
            bar_height: 36.0,
        }
    }
}

/// Oscillating selector over a list of spell slots.
///
/// # Example
///
/// ```
/// use grimoire::{ArrowConfig, SpellArrow};
///
/// let mut arrow = SpellArrow::new(ArrowConfig::default());
/// arrow.set_spell_count(4);
/// assert_eq!(arrow.current_spell_index(), None); // not started
///
/// arrow.start_selection();
/// // sin(0) puts the arrow in the middle of the sweep
/// assert_eq!(arrow.current_spell_index(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct SpellArrow {
    config: ArrowConfig,
    active: bool,
    angle: f64,
    spell_count: usize,
}

impl SpellArrow {
    /// Creates an inactive arrow over four slots.
    #[must_use]
    pub fn new(config: ArrowConfig) -> Self {
        Self {
            config,
            active: false,
            angle: 0.0,
            spell_count: 4,
        }
    }

    /// Layout parameters.
    #[must_use]
    pub fn config(&self) -> &ArrowConfig {
        &self.config
    }

    /// Starts the sweep from the middle of the range.
    pub fn start_selection(&mut self) {
        tracing::debug!(spells = self.spell_count, "spell arrow started");
        self.active = true;
        self.angle = 0.0;
    }

    /// Stops the sweep.
    pub fn stop_selection(&mut self) {
        self.active = false;
    }

    /// Whether the sweep is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the number of selectable slots.
    pub fn set_spell_count(&mut self, count: usize) {
        self.spell_count = count;
    }

    /// Number of selectable slots.
    #[must_use]
    pub fn spell_count(&self) -> usize {
        self.spell_count
    }

    /// Advances the sweep by `delta_ms` milliseconds.
    pub fn advance(&mut self, delta_ms: f64) {
        if !self.active {
            return;
        }
        self.angle = (self.angle + self.config.angular_speed * delta_ms / 1000.0).rem_euclid(TAU);
    }

    /// Current sweep phase in radians, in `[0, TAU)`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Offset of the last slot from the first.
    fn last_slot_offset(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let slots = self.spell_count.saturating_sub(1) as f64;
        slots * self.config.spell_spacing
    }

    /// Arrow offset relative to the first slot. Negative inside the top buffer.
    #[must_use]
    pub fn offset(&self) -> f64 {
        let normalized = (self.angle.sin() + 1.0) / 2.0;
        let total_range = self.last_slot_offset() + self.config.buffer * 2.0;
        normalized * total_range - self.config.buffer
    }

    /// Slot under the arrow, or `None` while inactive or inside a buffer zone.
    #[must_use]
    pub fn current_spell_index(&self) -> Option<usize> {
        if !self.active || self.spell_count == 0 {
            return None;
        }

        let offset = self.offset();
        if offset < 0.0 || offset > self.last_slot_offset() {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (offset / self.config.spell_spacing).round() as usize;
        Some(index.min(self.spell_count - 1))
    }
}
