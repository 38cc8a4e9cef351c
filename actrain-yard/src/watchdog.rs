//! Run timeout enforced from a second thread

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use actrain_core::train::EXTINGUISH_POLL_MS;
use actrain_core::Regulator;
use tracing::warn;

use crate::delay::StdDelay;

/// Extinguish the train behind `regulator` once `timeout` has elapsed
///
/// Returns early, without touching the train, when `finished` receives a
/// message or disconnects. If the timeout elapses before the loop has
/// ignited, keeps retrying until it ignites or finishes. Returns whether
/// an extinguish was delivered.
pub fn watch(regulator: &Regulator, finished: &Receiver<()>, timeout: Duration) -> bool {
    match finished.recv_timeout(timeout) {
        Err(RecvTimeoutError::Timeout) => {}
        _ => return false,
    }
    warn!(?timeout, "timeout reached, extinguishing");

    let poll = Duration::from_millis(u64::from(EXTINGUISH_POLL_MS));
    loop {
        if regulator.request_extinguish() {
            regulator.extinguish(&mut StdDelay);
            return true;
        }
        match finished.recv_timeout(poll) {
            Err(RecvTimeoutError::Timeout) => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    use actrain_core::{Outcome, Train, TrainConfig};
    use actrain_drivers::{Fixture, Passive};

    fn stalled_train(regulator: &Regulator) -> Train<'_, Fixture> {
        let mut train = Train::new(TrainConfig::with_loop_hz(100), regulator).unwrap();
        train
            .add(
                actrain_core::Actuator::new("stall", &[1.0], Fixture::from(Passive::new()))
                    .unwrap()
                    .with_external_flag(false),
            )
            .unwrap();
        train.build_train().unwrap();
        train
    }

    #[test]
    fn test_timeout_before_ignition_still_extinguishes() {
        let regulator = Regulator::new();
        let mut train = stalled_train(&regulator);
        let (done, finished) = mpsc::channel::<()>();

        let outcome = thread::scope(|s| {
            let shared = &regulator;
            let watchdog = s.spawn(move || watch(shared, &finished, Duration::ZERO));
            // ignite well after the timeout has already elapsed
            thread::sleep(Duration::from_millis(50));
            let outcome = train.ignite(0, &mut StdDelay);
            drop(done);
            assert!(watchdog.join().unwrap());
            outcome
        });

        assert_eq!(outcome, Ok(Outcome::Cancelled));
        let stall = train.stage_actuators(0).next().unwrap();
        assert!(stall.effector().is_halted());
    }

    #[test]
    fn test_finished_run_is_left_alone() {
        let regulator = Regulator::new();
        let (done, finished) = mpsc::channel::<()>();
        drop(done);
        assert!(!watch(&regulator, &finished, Duration::from_secs(60)));
        assert!(!regulator.is_extinguish_requested());
    }
}
