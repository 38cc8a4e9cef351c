//! Tagged union of every actuator variant
//!
//! A train holds one effector type; `Fixture` lets a single train mix
//! slews, dwells and passive actuators.

use actrain_core::{Drive, Effector};

use crate::dwell::Dwell;
use crate::passive::Passive;
use crate::registry::VariantKind;
use crate::slew::Slew;

/// Any actuator variant provided by this crate
#[derive(Debug, Clone, PartialEq)]
pub enum Fixture {
    /// Rate-limited follower
    Slew(Slew),
    /// Self-completing after a number of steps
    Dwell(Dwell),
    /// Externally fed
    Passive(Passive),
}

impl Fixture {
    /// Which variant this is
    pub fn kind(&self) -> VariantKind {
        match self {
            Fixture::Slew(_) => VariantKind::Slew,
            Fixture::Dwell(_) => VariantKind::Dwell,
            Fixture::Passive(_) => VariantKind::Passive,
        }
    }

    /// Check if the train stopped this actuator
    pub fn is_halted(&self) -> bool {
        match self {
            Fixture::Slew(s) => s.is_halted(),
            Fixture::Dwell(d) => d.is_halted(),
            Fixture::Passive(p) => p.is_halted(),
        }
    }
}

impl Effector for Fixture {
    fn init(&mut self, drive: &mut Drive<'_>) {
        match self {
            Fixture::Slew(s) => s.init(drive),
            Fixture::Dwell(d) => d.init(drive),
            Fixture::Passive(p) => p.init(drive),
        }
    }

    fn step(&mut self, drive: &mut Drive<'_>) {
        match self {
            Fixture::Slew(s) => s.step(drive),
            Fixture::Dwell(d) => d.step(drive),
            Fixture::Passive(p) => p.step(drive),
        }
    }

    fn stop(&mut self) {
        match self {
            Fixture::Slew(s) => s.stop(),
            Fixture::Dwell(d) => d.stop(),
            Fixture::Passive(p) => p.stop(),
        }
    }
}

impl From<Slew> for Fixture {
    fn from(s: Slew) -> Self {
        Fixture::Slew(s)
    }
}

impl From<Dwell> for Fixture {
    fn from(d: Dwell) -> Self {
        Fixture::Dwell(d)
    }
}

impl From<Passive> for Fixture {
    fn from(p: Passive) -> Self {
        Fixture::Passive(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actrain_core::{Actuator, Outcome, Regulator, Tolerance, Train, TrainConfig};

    use embedded_hal::delay::DelayNs;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_mixed_train_runs_to_completion() {
        let regulator = Regulator::new();
        let mut train = Train::new(TrainConfig::default(), &regulator).unwrap();

        let axis = Slew::new(1000.0).unwrap();
        train
            .add(
                Actuator::new("axis", &[-2500.0, 3300.1], Fixture::from(axis))
                    .unwrap()
                    .with_tolerance(Tolerance::Strict),
            )
            .unwrap();
        train
            .add(
                Actuator::new("soak", &[0.0], Fixture::from(Dwell::new(2)))
                    .unwrap()
                    .with_external_flag(false),
            )
            .unwrap();
        train.build_train().unwrap();

        assert_eq!(train.ignite(0, &mut NoDelay), Ok(Outcome::Success));
        for actuator in train.stage_actuators(0) {
            assert!(actuator.is_complete());
            assert!(!actuator.effector().is_halted());
        }
    }
}
