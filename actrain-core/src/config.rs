//! Train configuration
//!
//! The loop rate and tolerance presets are passed into each train at
//! construction; nothing here is global.

use crate::error::TrainError;
use crate::goal::Tolerance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum actuators per train (all stages, including the open one)
pub const MAX_ACTUATORS: usize = 32;

/// Maximum sealed stages per train
pub const MAX_STAGES: usize = 16;

/// Maximum actuators per stage
pub const MAX_STAGE_MEMBERS: usize = 8;

/// Maximum target/current length
pub const MAX_ARITY: usize = 6;

/// Maximum actuator name length
pub const MAX_NAME_LEN: usize = 16;

/// Default base loop rate in Hz
pub const DEFAULT_LOOP_HZ: u32 = 10;

/// Default strict tolerance
pub const STRICT_EPSILON: f64 = 0.001;

/// Default loose tolerance
pub const LOOSE_EPSILON: f64 = 1.0;

/// Named tolerance values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TolerancePresets {
    /// Epsilon used by `Tolerance::Strict`
    pub strict: f64,
    /// Epsilon used by `Tolerance::Loose`
    pub loose: f64,
}

impl Default for TolerancePresets {
    fn default() -> Self {
        Self {
            strict: STRICT_EPSILON,
            loose: LOOSE_EPSILON,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainConfig {
    /// Base tick rate in Hz; no actuator runs faster than this
    pub base_loop_hz: u32,
    /// Strict/loose epsilon values
    pub tolerances: TolerancePresets,
    /// Tolerance given to actuators that do not pick one
    pub default_tolerance: Tolerance,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            base_loop_hz: DEFAULT_LOOP_HZ,
            tolerances: TolerancePresets::default(),
            default_tolerance: Tolerance::Loose,
        }
    }
}

impl TrainConfig {
    /// Create a config with the given loop rate and default tolerances
    pub fn with_loop_hz(base_loop_hz: u32) -> Self {
        Self {
            base_loop_hz,
            ..Self::default()
        }
    }

    /// Check that the loop rate and every epsilon are usable
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.base_loop_hz == 0 {
            return Err(TrainError::InvalidConfig);
        }
        let epsilons = [
            self.tolerances.strict,
            self.tolerances.loose,
            self.default_tolerance.epsilon(&self.tolerances),
        ];
        if epsilons.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(TrainError::InvalidConfig);
        }
        Ok(())
    }

    /// Tick spacing in microseconds
    pub fn tick_period_us(&self) -> u32 {
        1_000_000 / self.base_loop_hz.max(1)
    }
}
