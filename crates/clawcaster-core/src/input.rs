//! Confirm-button input buffering.
//!
//! Presses and releases are buffered with a short time-to-live so a press
//! landing a frame early still counts. Each event carries a processed flag so
//! one physical press is consumed at most once across frames.
//!
//! The buffer has no clock of its own: callers pass timestamps in
//! milliseconds.

use serde::{Deserialize, Serialize};

use crate::config::InputConfig;

/// Edge of a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Button went down.
    Press,
    /// Button went up.
    Release,
}

/// One buffered button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Press or release.
    pub kind: InputKind,
    /// When it happened, ms.
    pub timestamp: u64,
    /// Whether it has been consumed.
    pub processed: bool,
}

/// Buffer of recent confirm-button events.
///
/// # Example
///
/// ```
/// use clawcaster_core::{InputBuffer, InputConfig, InputKind};
///
/// let mut input = InputBuffer::new(InputConfig::default());
/// input.press(1_000);
/// assert!(input.consume(InputKind::Press).is_some());
/// assert!(input.consume(InputKind::Press).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    config: InputConfig,
    events: Vec<InputEvent>,
    blocked: bool,
    last_input: Option<u64>,
}

impl InputBuffer {
    /// Creates an empty, unblocked buffer.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Records a press. Ignored while blocked.
    pub fn press(&mut self, now: u64) {
        self.push(InputKind::Press, now);
    }

    /// Records a release. Ignored while blocked.
    pub fn release(&mut self, now: u64) {
        self.push(InputKind::Release, now);
    }

    fn push(&mut self, kind: InputKind, now: u64) {
        if self.blocked {
            return;
        }
        self.events.push(InputEvent {
            kind,
            timestamp: now,
            processed: false,
        });
        self.last_input = Some(now);
        self.prune(now);
    }

    fn prune(&mut self, now: u64) {
        let ttl = self.config.buffer_ms;
        self.events
            .retain(|event| now.saturating_sub(event.timestamp) <= ttl);
    }

    /// Marks the oldest unprocessed event of `kind` processed and returns it.
    pub fn consume(&mut self, kind: InputKind) -> Option<InputEvent> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.kind == kind && !e.processed)?;
        event.processed = true;
        Some(*event)
    }

    /// Whether an unprocessed event of `kind` is buffered.
    #[must_use]
    pub fn has_unprocessed(&self, kind: InputKind) -> bool {
        self.events.iter().any(|e| e.kind == kind && !e.processed)
    }

    /// Whether the last recorded input is within the timing window of `now`.
    #[must_use]
    pub fn is_within_timing_window(&self, now: u64) -> bool {
        self.last_input
            .is_some_and(|last| now.saturating_sub(last) <= self.config.timing_window_ms)
    }

    /// Stops recording new events.
    pub fn block(&mut self) {
        self.blocked = true;
    }

    /// Resumes recording.
    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    /// Whether recording is blocked.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Changes the timing window.
    pub fn set_timing_window(&mut self, ms: u64) {
        self.config.timing_window_ms = ms;
    }

    /// Drops every buffered event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Drops expired events. Call once per frame.
    pub fn update(&mut self, now: u64) {
        self.prune(now);
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }
}
