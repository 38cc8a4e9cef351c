//! Actuators
//!
//! An actuator pairs a per-tick effect (the [`Effector`]) with the values
//! the scheduler tracks for it: target, current, update rate, goal policy
//! and lifecycle flags.

pub mod effector;
pub mod record;

pub use effector::{Drive, Effector};
pub use record::{Actuator, ActuatorId};
