//! Cross-thread extinguish against a running train

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use actrain_core::{Actuator, Drive, Effector, Outcome, Regulator, Train, TrainConfig};
use embedded_hal::delay::DelayNs;

struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

/// Never completes on its own
#[derive(Default)]
struct Stall {
    steps: u32,
    stops: u32,
}

impl Effector for Stall {
    fn step(&mut self, _drive: &mut Drive<'_>) {
        self.steps += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

fn stalled(name: &str) -> Actuator<Stall> {
    Actuator::new(name, &[1.0], Stall::default())
        .unwrap()
        .with_external_flag(false)
}

fn wait_for_ignition(regulator: &Regulator) {
    for _ in 0..1000 {
        if regulator.is_ignited() {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("train never ignited");
}

#[test]
fn extinguish_from_another_thread() {
    let regulator = Regulator::new();
    let mut train = Train::new(TrainConfig::with_loop_hz(100), &regulator).unwrap();
    train.add(stalled("left")).unwrap();
    train.add(stalled("right")).unwrap();
    train.build_train().unwrap();

    let outcome = thread::scope(|s| {
        let runner = s.spawn(|| train.ignite(0, &mut SleepDelay));
        wait_for_ignition(&regulator);
        assert_eq!(regulator.current_stage(), Some(0));

        regulator.extinguish(&mut SleepDelay);
        assert!(!regulator.is_ignited());
        runner.join().unwrap()
    });

    assert_eq!(outcome, Ok(Outcome::Cancelled));
    for actuator in train.stage_actuators(0) {
        assert_eq!(actuator.effector().stops, 1);
    }
}

#[test]
fn extinguish_with_static_regulator() {
    static REGULATOR: Regulator = Regulator::new();

    let mut train = Train::new(TrainConfig::with_loop_hz(200), &REGULATOR).unwrap();
    train.add(stalled("only")).unwrap();
    train.build_train().unwrap();

    let watchdog = thread::spawn(|| {
        wait_for_ignition(&REGULATOR);
        thread::sleep(Duration::from_millis(30));
        REGULATOR.extinguish(&mut SleepDelay);
    });

    assert_eq!(train.ignite(0, &mut SleepDelay), Ok(Outcome::Cancelled));
    watchdog.join().unwrap();

    let only = train.stage_actuators(0).next().unwrap();
    assert!(only.effector().steps > 0);
    assert_eq!(only.effector().stops, 1);
}

#[test]
fn extinguish_idle_train_returns_immediately() {
    let regulator = Regulator::new();
    let mut train = Train::new(TrainConfig::default(), &regulator).unwrap();
    train.add(stalled("only")).unwrap();
    train.build_train().unwrap();

    regulator.extinguish(&mut SleepDelay);
    assert!(!regulator.is_ignited());
    assert!(!train.is_ignited());
}

#[test]
fn request_racing_completion_never_lingers() {
    let regulator = Regulator::new();
    let mut train = Train::new(TrainConfig::default(), &regulator).unwrap();
    train
        .add(
            Actuator::new("done", &[0.0], Stall::default())
                .unwrap()
                .with_external_flag(true),
        )
        .unwrap();
    train.build_train().unwrap();

    let finished = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            while !finished.load(Ordering::Acquire) {
                regulator.request_extinguish();
            }
        });

        for _ in 0..2000 {
            train.start(0).unwrap();
            // completes or observes the request on its first tick
            assert!(train.tick().is_some());
            assert!(!regulator.is_ignited());
            assert!(!regulator.is_extinguish_requested());
        }
        finished.store(true, Ordering::Release);
    });
}
