use actrain_core::{ActuatorError, TrainError};
use actrain_drivers::VariantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("train error: {0}")]
    Train(#[from] TrainError),

    #[error("actuator '{name}': {source}")]
    Actuator {
        name: String,
        #[source]
        source: ActuatorError,
    },

    #[error("actuator '{name}': {source}")]
    Variant {
        name: String,
        #[source]
        source: VariantError,
    },

    #[error("unknown train: {0}")]
    UnknownTrain(String),

    #[error("train already registered: {0}")]
    DuplicateTrain(String),

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

pub type Result<T> = std::result::Result<T, YardError>;
