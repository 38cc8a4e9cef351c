//! Host tooling for actrain
//!
//! Loads train definitions from TOML, keeps them in a [`TrainFactory`]
//! and runs them on the host with a sleeping [`StdDelay`].

pub mod config;
pub mod delay;
pub mod error;
pub mod factory;
pub mod watchdog;

pub use config::{ActuatorDef, ConfigSection, GoalKind, StageDef, ToleranceDef, TrainDef, YardFile};
pub use delay::StdDelay;
pub use error::{Result, YardError};
pub use factory::{dummy_train, TrainFactory, DUMMY_TRAIN};
