//! Train scheduler
//!
//! A train is an ordered list of sealed stages plus the loop that drives
//! them. Each tick initializes newly reached actuators, rate-divides and
//! steps the rest, then advances once every actuator in the stage is
//! complete.

pub mod regulator;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod summary;

pub use regulator::{Regulator, EXTINGUISH_POLL_MS};
pub use scheduler::Train;
pub use stage::Stage;
pub use state::{Outcome, TrainEvent, TrainState};
pub use summary::Summary;
