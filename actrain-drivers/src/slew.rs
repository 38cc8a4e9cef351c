//! Rate-limited follower
//!
//! Each step moves every current value toward its target by at most
//! `rate`. Stands in for a real axis whose position is read back after
//! every move.

use actrain_core::{Drive, Effector};

/// Simulated axis with a bounded per-step move
#[derive(Debug, Clone, PartialEq)]
pub struct Slew {
    /// Largest change per step, per element
    rate: f64,
    /// Steps taken this run
    steps: u32,
    /// `stop` was called
    halted: bool,
}

impl Slew {
    /// Create a follower moving at most `rate` per step
    ///
    /// Returns None for a non-positive or non-finite rate.
    pub fn new(rate: f64) -> Option<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        Some(Self {
            rate,
            steps: 0,
            halted: false,
        })
    }

    /// Largest change per step
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Steps taken this run
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Check if the train stopped this axis
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl Effector for Slew {
    fn init(&mut self, _drive: &mut Drive<'_>) {
        self.steps = 0;
        self.halted = false;
    }

    fn step(&mut self, drive: &mut Drive<'_>) {
        self.steps += 1;
        let rate = self.rate;
        for i in 0..drive.target().len() {
            let target = drive.target()[i];
            let current = &mut drive.current_mut()[i];
            let delta = (target - *current).max(-rate).min(rate);
            *current += delta;
        }
    }

    fn stop(&mut self) {
        self.halted = true;
    }
}
