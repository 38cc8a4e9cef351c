//! Actuator record
//!
//! Holds target/current values, update rate, goal policy and the
//! lifecycle state owned by the scheduler.

use heapless::{String, Vec};

use super::effector::{Drive, Effector};
use crate::config::{TolerancePresets, MAX_ARITY, MAX_NAME_LEN};
use crate::error::ActuatorError;
use crate::goal::{GoalPolicy, Tolerance};

/// Stable handle of an actuator inside a train's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorId(pub(crate) u8);

impl ActuatorId {
    /// Position in the train's arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A unit of work driven toward its goal by the scheduler
///
/// `target` and `current` always have the same length. The lifecycle
/// fields (`initialized`, tick counter, `complete`) are only mutated by
/// the train that owns the actuator.
#[derive(Debug, Clone)]
pub struct Actuator<E> {
    /// Lookup key, unique within a stage
    name: String<MAX_NAME_LEN>,
    /// Goal values, arity fixed at construction
    target: Vec<f64, MAX_ARITY>,
    /// Measured or simulated values
    current: Vec<f64, MAX_ARITY>,
    /// Requested update rate in Hz (None = every tick)
    update_hz: Option<f64>,
    /// Completion policy (None = train default tolerance)
    policy: Option<GoalPolicy>,
    /// External completion flag
    flag: bool,
    /// Flag value restored at the start of every run
    preset: bool,
    /// Ticks seen since initialization, for rate division
    tick_counter: u32,
    /// `init` has run for the current execution
    initialized: bool,
    /// Result of the last goal evaluation
    complete: bool,
    /// Variant-specific behavior
    effector: E,
}

impl<E: Effector> Actuator<E> {
    /// Create an actuator with the given target and zeroed current values
    pub fn new(name: &str, target: &[f64], effector: E) -> Result<Self, ActuatorError> {
        if target.is_empty() {
            return Err(ActuatorError::EmptyTarget);
        }
        let name = String::try_from(name).map_err(|_| ActuatorError::NameTooLong)?;
        let target = Vec::from_slice(target).map_err(|_| ActuatorError::TooManyValues)?;
        let mut current = Vec::new();
        current
            .resize(target.len(), 0.0)
            .map_err(|_| ActuatorError::TooManyValues)?;

        Ok(Self {
            name,
            target,
            current,
            update_hz: None,
            policy: None,
            flag: false,
            preset: false,
            tick_counter: 0,
            initialized: false,
            complete: false,
            effector,
        })
    }

    /// Use an explicit goal policy
    pub fn with_policy(mut self, policy: GoalPolicy) -> Self {
        self.policy = Some(policy);
        self.reset_run();
        self
    }

    /// Converge on target within the given tolerance
    pub fn with_tolerance(self, tolerance: Tolerance) -> Self {
        self.with_policy(GoalPolicy::Converge(tolerance))
    }

    /// Complete on the external flag, starting from `preset`
    pub fn with_external_flag(mut self, preset: bool) -> Self {
        self.flag = preset;
        self.preset = preset;
        self.with_policy(GoalPolicy::ExternalFlag)
    }

    /// Request an update rate in Hz
    ///
    /// The owning train clamps it to its base loop rate.
    pub fn with_update_hz(mut self, hz: f64) -> Result<Self, ActuatorError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ActuatorError::InvalidFrequency);
        }
        self.update_hz = Some(hz);
        Ok(self)
    }

    /// Actuator name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Number of target/current values
    pub fn arity(&self) -> usize {
        self.target.len()
    }

    /// Target values
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Current values
    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// Replace the target values; arity must not change
    pub fn set_target(&mut self, values: &[f64]) -> Result<(), ActuatorError> {
        self.check_arity(values)?;
        self.target.copy_from_slice(values);
        Ok(())
    }

    /// Replace the current values; arity must not change
    pub fn set_current(&mut self, values: &[f64]) -> Result<(), ActuatorError> {
        self.check_arity(values)?;
        self.current.copy_from_slice(values);
        Ok(())
    }

    fn check_arity(&self, values: &[f64]) -> Result<(), ActuatorError> {
        if values.len() != self.target.len() {
            return Err(ActuatorError::ArityMismatch {
                expected: self.target.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Requested update rate (None = every tick)
    pub fn update_hz(&self) -> Option<f64> {
        self.update_hz
    }

    /// Goal policy in effect
    pub fn policy(&self) -> GoalPolicy {
        self.policy.unwrap_or_default()
    }

    /// Result of the last goal evaluation
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether `init` has run for the current execution
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Ticks counted since initialization
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// External completion flag
    pub fn is_signalled(&self) -> bool {
        self.flag
    }

    /// Raise the external completion flag
    ///
    /// Takes effect immediately for `ExternalFlag` actuators.
    pub fn signal_complete(&mut self) {
        self.flag = true;
        if self.policy() == GoalPolicy::ExternalFlag {
            self.complete = true;
        }
    }

    /// Variant behavior
    pub fn effector(&self) -> &E {
        &self.effector
    }

    /// Variant behavior, mutable
    pub fn effector_mut(&mut self) -> &mut E {
        &mut self.effector
    }

    /// Ticks between steps at the given base rate, never zero
    pub fn divisor(&self, base_loop_hz: u32) -> u32 {
        let base = base_loop_hz as f64;
        let hz = match self.update_hz {
            Some(hz) if hz < base => hz,
            _ => base,
        };
        // float-to-int casts saturate; floor for positive values
        ((base / hz) as u32).max(1)
    }

    /// Resolve defaults and clamp the rate to what the train can run
    pub(crate) fn attach(&mut self, base_loop_hz: u32, default_tolerance: Tolerance) {
        if self.policy.is_none() {
            self.policy = Some(GoalPolicy::Converge(default_tolerance));
        }
        let base = base_loop_hz as f64;
        if let Some(hz) = self.update_hz {
            if hz > base {
                self.update_hz = Some(base);
            }
        }
        self.reset_run();
    }

    /// Restore the state a fresh execution starts from
    pub(crate) fn reset_run(&mut self) {
        self.flag = self.preset;
        self.tick_counter = 0;
        self.initialized = false;
        self.complete = self.policy() == GoalPolicy::ExternalFlag && self.flag;
    }

    /// Run `init` and mark the actuator initialized
    pub(crate) fn initialize(&mut self) {
        let mut drive = Drive {
            target: &self.target,
            current: &mut self.current,
            flag: &mut self.flag,
        };
        self.effector.init(&mut drive);
        self.initialized = true;
    }

    /// Count a tick and step if this tick falls on the actuator's rate
    ///
    /// Returns whether `step` ran.
    pub(crate) fn poll(&mut self, base_loop_hz: u32, presets: &TolerancePresets) -> bool {
        let due = self.tick_counter % self.divisor(base_loop_hz) == 0;
        self.tick_counter = self.tick_counter.wrapping_add(1);
        if due {
            self.step(presets);
        }
        due
    }

    /// Run one step and re-evaluate the goal
    pub(crate) fn step(&mut self, presets: &TolerancePresets) {
        let mut drive = Drive {
            target: &self.target,
            current: &mut self.current,
            flag: &mut self.flag,
        };
        self.effector.step(&mut drive);
        self.complete = self
            .policy()
            .evaluate(presets, &self.target, &self.current, self.flag);
    }

    /// Forward a stop request to the effector
    pub(crate) fn halt(&mut self) {
        self.effector.stop();
    }
}
