//! Stage: actuators executed together

use heapless::Vec;

use crate::actuator::ActuatorId;
use crate::config::MAX_STAGE_MEMBERS;
use crate::error::TrainError;

/// A set of actuator handles that runs and advances as one unit
///
/// Membership is fixed once the stage is sealed. Iteration order is
/// insertion order and stays the same on every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stage {
    members: Vec<ActuatorId, MAX_STAGE_MEMBERS>,
}

impl Stage {
    /// Create an empty stage
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Actuator handles in iteration order
    pub fn members(&self) -> &[ActuatorId] {
        &self.members
    }

    /// Number of actuators
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the stage has no actuators
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the stage can take another actuator
    pub fn is_full(&self) -> bool {
        self.members.is_full()
    }

    pub(crate) fn push(&mut self, id: ActuatorId) -> Result<(), TrainError> {
        self.members
            .push(id)
            .map_err(|_| TrainError::CapacityExceeded)
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }
}
