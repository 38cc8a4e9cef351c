//! Externally measured actuator
//!
//! Performs no action of its own; its current values are supplied with
//! `Train::feed_current` (e.g. from a sensor read between ticks).

use actrain_core::{Drive, Effector};

/// Effector with no per-tick action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Passive {
    halted: bool,
}

impl Passive {
    /// Create a passive effector
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the train stopped this actuator
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl Effector for Passive {
    fn init(&mut self, _drive: &mut Drive<'_>) {
        self.halted = false;
    }

    fn step(&mut self, _drive: &mut Drive<'_>) {}

    fn stop(&mut self) {
        self.halted = true;
    }
}
