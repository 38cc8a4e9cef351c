//! Property tests for goal evaluation, rate division and stage advance

use actrain_core::config::TolerancePresets;
use actrain_core::goal::within;
use actrain_core::{
    Actuator, Drive, Effector, GoalPolicy, Regulator, Tolerance, Train, TrainConfig, TrainEvent,
};
use proptest::prelude::*;

struct Inert;

impl Effector for Inert {
    fn step(&mut self, _drive: &mut Drive<'_>) {}
}

proptest! {
    #[test]
    fn tolerance_is_symmetric(
        t in -1e6f64..1e6,
        c in -1e6f64..1e6,
        epsilon in 0.0f64..10.0,
    ) {
        let presets = TolerancePresets::default();
        let policy = GoalPolicy::Converge(Tolerance::Within(epsilon));
        prop_assert_eq!(
            policy.evaluate(&presets, &[t], &[c], false),
            policy.evaluate(&presets, &[c], &[t], false)
        );
        prop_assert_eq!(policy.evaluate(&presets, &[t], &[c], false), within(t, c, epsilon));
    }

    #[test]
    fn identical_values_always_converge(values in prop::collection::vec(-1e6f64..1e6, 1..6)) {
        let presets = TolerancePresets::default();
        let policy = GoalPolicy::Converge(Tolerance::Strict);
        prop_assert!(policy.evaluate(&presets, &values, &values, false));
    }

    #[test]
    fn divisor_never_zero(base in 1u32..1000, hz in 1e-3f64..1e4) {
        let actuator = Actuator::new("a", &[0.0], Inert)
            .unwrap()
            .with_update_hz(hz)
            .unwrap();
        let divisor = actuator.divisor(base);
        prop_assert!(divisor >= 1);
        if hz >= base as f64 {
            prop_assert_eq!(divisor, 1);
        } else {
            prop_assert_eq!(divisor, ((base as f64) / hz) as u32);
        }
    }

    #[test]
    fn guaranteed_goals_take_one_tick_per_stage(stages in 1usize..10, width in 1usize..4) {
        let regulator = Regulator::new();
        let mut train = Train::new(TrainConfig::default(), &regulator).unwrap();
        let names = ["a", "b", "c", "d"];
        for _ in 0..stages {
            for name in names.iter().take(width) {
                let actuator = Actuator::new(name, &[1.0], Inert)
                    .unwrap()
                    .with_external_flag(true);
                train.add(actuator).unwrap();
            }
            train.build().unwrap();
        }

        train.start(0).unwrap();
        let mut advances = 0;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match train.tick() {
                Some(TrainEvent::StageComplete(_)) => advances += 1,
                Some(TrainEvent::Completed) => break,
                other => prop_assert!(false, "unexpected tick result {:?}", other),
            }
        }
        prop_assert_eq!(advances + 1, stages);
        prop_assert_eq!(ticks, stages);
    }
}
