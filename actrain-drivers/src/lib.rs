//! Actuator variant implementations
//!
//! This crate provides concrete [`Effector`](actrain_core::Effector)
//! implementations and the registry that builds them by name:
//!
//! - Slew: simulated axis moving toward its target at a bounded rate
//! - Dwell: completes itself after a fixed number of steps
//! - Passive: no effect; current values come from `feed_current`

#![no_std]
#![deny(unsafe_code)]

pub mod dwell;
pub mod fixture;
pub mod passive;
pub mod registry;
pub mod slew;

pub use dwell::Dwell;
pub use fixture::Fixture;
pub use passive::Passive;
pub use registry::{VariantError, VariantKind};
pub use slew::Slew;
