//! Effector capability trait
//!
//! The effector is the opaque part of an actuator: whatever physical or
//! simulated action it performs each tick. The scheduler only sees it
//! through `init`, `step` and `stop`.

use crate::error::ActuatorError;

/// Mutable view of an actuator's values handed to its effector
///
/// The target is read-only; current values and the external completion
/// flag may be written.
pub struct Drive<'a> {
    pub(super) target: &'a [f64],
    pub(super) current: &'a mut [f64],
    pub(super) flag: &'a mut bool,
}

impl<'a> Drive<'a> {
    /// Create a view over caller-owned values
    ///
    /// Fails if `current` does not have the same length as `target`.
    pub fn new(
        target: &'a [f64],
        current: &'a mut [f64],
        flag: &'a mut bool,
    ) -> Result<Self, ActuatorError> {
        if target.len() != current.len() {
            return Err(ActuatorError::ArityMismatch {
                expected: target.len(),
                actual: current.len(),
            });
        }
        Ok(Self {
            target,
            current,
            flag,
        })
    }

    /// Target values
    pub fn target(&self) -> &[f64] {
        self.target
    }

    /// Current values
    pub fn current(&self) -> &[f64] {
        self.current
    }

    /// Current values, writable in place
    pub fn current_mut(&mut self) -> &mut [f64] {
        self.current
    }

    /// Replace all current values
    pub fn set_current(&mut self, values: &[f64]) -> Result<(), ActuatorError> {
        if values.len() != self.current.len() {
            return Err(ActuatorError::ArityMismatch {
                expected: self.current.len(),
                actual: values.len(),
            });
        }
        self.current.copy_from_slice(values);
        Ok(())
    }

    /// Raise the external completion flag
    ///
    /// Only consulted by actuators using `GoalPolicy::ExternalFlag`.
    pub fn signal_complete(&mut self) {
        *self.flag = true;
    }

    /// Whether the external completion flag is raised
    pub fn is_signalled(&self) -> bool {
        *self.flag
    }
}

/// Per-variant actuator behavior
///
/// Implementations must leave `current` reflecting any measured or
/// simulated progress when `step` returns; the goal policy is evaluated
/// right after.
pub trait Effector {
    /// One-time setup, called on the tick the actuator is first reached
    fn init(&mut self, drive: &mut Drive<'_>) {
        let _ = drive;
    }

    /// One unit of per-tick work
    fn step(&mut self, drive: &mut Drive<'_>);

    /// Called when the train is extinguished while this actuator's stage is active
    fn stop(&mut self) {}
}
