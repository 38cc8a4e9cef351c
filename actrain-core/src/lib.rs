//! Board-agnostic core logic for staged actuator sequencing
//!
//! This crate contains everything that does not depend on a concrete
//! effector or a concrete clock:
//!
//! - Goal policies (tolerance comparison, external completion flag)
//! - Actuator records and the `Effector` capability trait
//! - Stages and the train scheduler (rate division, stage advance)
//! - Cooperative cancellation via the [`train::Regulator`]
//! - Train configuration and error types
//!
//! The scheduler never allocates; all storage is fixed-capacity.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod actuator;
pub mod config;
pub mod error;
pub mod goal;
pub mod train;

pub use actuator::{Actuator, ActuatorId, Drive, Effector};
pub use config::{TolerancePresets, TrainConfig};
pub use error::{ActuatorError, TrainError};
pub use goal::{GoalPolicy, Tolerance};
pub use train::{Outcome, Regulator, Stage, Train, TrainEvent, TrainState};
