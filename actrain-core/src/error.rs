//! Error types for actuator and train construction

use core::fmt;

/// Errors raised when building or mutating an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Target vector has no values
    EmptyTarget,
    /// Value count does not match the actuator's arity
    ArityMismatch {
        /// Arity fixed at construction
        expected: usize,
        /// Length of the rejected input
        actual: usize,
    },
    /// More values than `MAX_ARITY`
    TooManyValues,
    /// Name longer than `MAX_NAME_LEN`
    NameTooLong,
    /// Update frequency is zero, negative or not finite
    InvalidFrequency,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorError::EmptyTarget => f.write_str("actuator target must not be empty"),
            ActuatorError::ArityMismatch { expected, actual } => {
                write!(f, "expected {} values, got {}", expected, actual)
            }
            ActuatorError::TooManyValues => f.write_str("too many values for actuator"),
            ActuatorError::NameTooLong => f.write_str("actuator name too long"),
            ActuatorError::InvalidFrequency => f.write_str("update frequency must be positive"),
        }
    }
}

impl core::error::Error for ActuatorError {}

/// Errors raised by train construction and ignition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrainError {
    /// `ignite` called with no sealed stages
    EmptyTrain,
    /// `build` called with nothing added since the last seal
    EmptyStage,
    /// `ignite` asked to start past the last stage
    StageOutOfRange {
        /// Requested start index
        index: usize,
        /// Number of sealed stages
        stages: usize,
    },
    /// Actuator, stage or member capacity exhausted
    CapacityExceeded,
    /// Another actuator in the open stage already uses this name
    DuplicateName,
    /// Loop rate or tolerance presets are unusable
    InvalidConfig,
    /// The train is running; stages are fixed until it stops
    Ignited,
    /// The actuator itself was rejected
    Actuator(ActuatorError),
}

impl From<ActuatorError> for TrainError {
    fn from(e: ActuatorError) -> Self {
        TrainError::Actuator(e)
    }
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::EmptyTrain => f.write_str("an empty train cannot be ignited"),
            TrainError::EmptyStage => f.write_str("an empty stage cannot be built"),
            TrainError::StageOutOfRange { index, stages } => {
                write!(f, "stage {} out of range ({} stages)", index, stages)
            }
            TrainError::CapacityExceeded => f.write_str("train capacity exceeded"),
            TrainError::DuplicateName => f.write_str("duplicate actuator name in stage"),
            TrainError::InvalidConfig => f.write_str("invalid train configuration"),
            TrainError::Ignited => f.write_str("train is already ignited"),
            TrainError::Actuator(e) => write!(f, "actuator rejected: {}", e),
        }
    }
}

impl core::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TrainError::Actuator(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_error_converts() {
        let err: TrainError = ActuatorError::EmptyTarget.into();
        assert_eq!(err, TrainError::Actuator(ActuatorError::EmptyTarget));
    }
}
