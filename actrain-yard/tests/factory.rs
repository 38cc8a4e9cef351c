use std::io::Write;

use actrain_core::{Outcome, Regulator, TrainEvent};
use actrain_drivers::Fixture;
use actrain_yard::{TrainFactory, YardError, DUMMY_TRAIN};
use embedded_hal::delay::DelayNs;

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

const DEFINITIONS: &str = r#"
[config]
base_loop_hz = 50

[[train]]
name = "press"

[[train.stage]]
[[train.stage.actuator]]
name = "ram"
kind = "slew"
target = [12.0]
tolerance = "strict"
rate = 4.0

[[train.stage.actuator]]
name = "hold"
kind = "dwell"
target = [0.0]
goal = "flag"
steps = 5

[[train.stage]]
[[train.stage.actuator]]
name = "ram"
kind = "slew"
target = [0.0]
tolerance = 0.5
rate = 6.0
update_hz = 25.0
"#;

fn write_definitions(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_toml_registers_trains() {
    let file = write_definitions(DEFINITIONS);
    let mut factory = TrainFactory::new();

    assert_eq!(factory.load_toml(file.path()).unwrap(), 1);

    let names: Vec<_> = factory.names().collect();
    assert_eq!(names, vec![DUMMY_TRAIN, "press"]);

    let regulator = Regulator::new();
    let train = factory.build("press", &regulator).unwrap();
    assert_eq!(train.stage_count(), 2);
    assert_eq!(train.config().base_loop_hz, 50);
}

#[test]
fn test_loaded_train_runs_to_completion() {
    let file = write_definitions(DEFINITIONS);
    let mut factory = TrainFactory::empty();
    factory.load_toml(file.path()).unwrap();

    let regulator = Regulator::new();
    let mut train = factory.build("press", &regulator).unwrap();
    assert_eq!(train.ignite(0, &mut NoDelay), Ok(Outcome::Success));

    let ram = train.stage_actuators(1).next().unwrap();
    assert_eq!(ram.current(), &[0.0]);
    assert!(!regulator.is_ignited());
}

#[test]
fn test_dwell_holds_stage_open() {
    let file = write_definitions(DEFINITIONS);
    let mut factory = TrainFactory::empty();
    factory.load_toml(file.path()).unwrap();

    let regulator = Regulator::new();
    let mut train = factory.build("press", &regulator).unwrap();
    train.start(0).unwrap();

    // init tick, then ram needs 3 steps and hold needs 5
    let mut ticks = 0;
    loop {
        ticks += 1;
        if let Some(event) = train.tick() {
            assert_eq!(event, TrainEvent::StageComplete(0));
            break;
        }
    }
    assert_eq!(ticks, 6);

    let ram = train.stage_actuators(0).next().unwrap();
    assert_eq!(ram.current(), &[12.0]);
    match ram.effector() {
        Fixture::Slew(s) => assert_eq!(s.steps(), 5),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_dummy_train_completes() {
    let factory = TrainFactory::new();
    let regulator = Regulator::new();
    let mut train = factory.build(DUMMY_TRAIN, &regulator).unwrap();

    assert_eq!(train.ignite(0, &mut NoDelay), Ok(Outcome::Success));
    let foo = train.stage_actuators(1).next().unwrap();
    assert_eq!(foo.current(), &[-2500.0, 3300.1]);
}

#[test]
fn test_bad_file_is_reported() {
    let file = write_definitions("[[train]]\nname = 3\n");
    let mut factory = TrainFactory::new();
    assert!(matches!(factory.load_toml(file.path()), Err(YardError::Toml(_))));

    let missing = file.path().with_extension("missing");
    assert!(matches!(factory.load_toml(&missing), Err(YardError::Io(_))));
}
