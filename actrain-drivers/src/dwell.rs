//! Fixed-duration action
//!
//! Counts its own steps and raises the external completion flag once
//! enough have run. Pair with `GoalPolicy::ExternalFlag`.

use actrain_core::{Drive, Effector};

/// Completes itself after a fixed number of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dwell {
    /// Steps required before signalling completion
    steps: u32,
    /// Steps taken this run
    count: u32,
    /// `stop` was called
    halted: bool,
}

impl Dwell {
    /// Create a dwell of `steps` steps
    pub fn new(steps: u32) -> Self {
        Self {
            steps,
            count: 0,
            halted: false,
        }
    }

    /// Steps required
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Steps taken this run
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Check if the train stopped this dwell
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl Effector for Dwell {
    fn init(&mut self, _drive: &mut Drive<'_>) {
        self.count = 0;
        self.halted = false;
    }

    fn step(&mut self, drive: &mut Drive<'_>) {
        self.count = self.count.saturating_add(1);
        if self.count >= self.steps {
            drive.signal_complete();
        }
    }

    fn stop(&mut self) {
        self.halted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_after_steps() {
        let mut dwell = Dwell::new(3);
        let target = [0.0];
        let mut current = [0.0];
        let mut flag = false;
        let mut drive = Drive::new(&target, &mut current, &mut flag).unwrap();

        dwell.init(&mut drive);
        dwell.step(&mut drive);
        dwell.step(&mut drive);
        assert!(!drive.is_signalled());
        dwell.step(&mut drive);
        assert!(drive.is_signalled());
        assert_eq!(dwell.count(), 3);
    }

    #[test]
    fn test_zero_steps_completes_on_first_step() {
        let mut dwell = Dwell::new(0);
        let target = [0.0];
        let mut current = [0.0];
        let mut flag = false;
        let mut drive = Drive::new(&target, &mut current, &mut flag).unwrap();

        dwell.step(&mut drive);
        assert!(drive.is_signalled());
    }
}
