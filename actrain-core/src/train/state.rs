//! Train execution state and outcomes

use crate::error::TrainError;

/// Where the train is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrainState {
    /// Not ignited (initial state, and after an extinguish)
    #[default]
    Idle,
    /// Executing the stage at this index
    Running(usize),
    /// Stopping the active stage after an extinguish request
    Extinguishing,
    /// Last stage reported complete
    Completed,
    /// Ignition was refused
    Failed(TrainError),
}

impl TrainState {
    /// Check if the scheduler loop is active
    pub fn is_running(&self) -> bool {
        matches!(self, TrainState::Running(_))
    }

    /// Active stage index, if running
    pub fn stage(&self) -> Option<usize> {
        match self {
            TrainState::Running(index) => Some(*index),
            _ => None,
        }
    }

    /// Check if this is an end state of an ignition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrainState::Idle | TrainState::Completed | TrainState::Failed(_)
        )
    }
}

/// How a finished ignition ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Every stage completed
    Success,
    /// Stopped by an extinguish request
    Cancelled,
}

/// Notable transitions produced by a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrainEvent {
    /// Stage at this index completed; the next one is now active
    StageComplete(usize),
    /// The last stage completed
    Completed,
    /// Extinguished while the stage at this index was active
    Extinguished(usize),
}
