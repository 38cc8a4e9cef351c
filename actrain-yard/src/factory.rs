//! Named train registry
//!
//! Holds train definitions, not trains: every `build` instantiates a fresh
//! `Train` with fresh actuators bound to the caller's `Regulator`.

use std::collections::BTreeMap;
use std::path::Path;

use actrain_core::{Regulator, Tolerance, Train, TrainConfig};
use actrain_drivers::Fixture;
use tracing::{debug, info};

use crate::config::{ActuatorDef, GoalKind, StageDef, ToleranceDef, TrainDef, YardFile};
use crate::error::{Result, YardError};

/// Name of the built-in demonstration train
pub const DUMMY_TRAIN: &str = "dummy_train";

#[derive(Debug, Clone)]
struct Entry {
    config: TrainConfig,
    def: TrainDef,
}

/// Registry of train definitions by name
#[derive(Debug, Clone)]
pub struct TrainFactory {
    entries: BTreeMap<String, Entry>,
}

impl Default for TrainFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainFactory {
    /// Create a factory holding the built-in trains
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.entries.insert(
            DUMMY_TRAIN.to_string(),
            Entry {
                config: TrainConfig::default(),
                def: dummy_train(),
            },
        );
        factory
    }

    /// Create a factory with no trains
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a definition under its own name
    ///
    /// The definition is checked by building it once.
    pub fn register(&mut self, def: TrainDef, config: TrainConfig) -> Result<()> {
        if self.entries.contains_key(&def.name) {
            return Err(YardError::DuplicateTrain(def.name));
        }
        let regulator = Regulator::new();
        assemble(&def, config, &regulator)?;

        debug!(train = %def.name, stages = def.stages.len(), "registered train");
        self.entries.insert(def.name.clone(), Entry { config, def });
        Ok(())
    }

    /// Register every train in a parsed definition file
    ///
    /// Returns the number of trains added.
    pub fn register_file(&mut self, file: YardFile) -> Result<usize> {
        let config = file.config.to_train_config()?;
        let count = file.trains.len();
        for def in file.trains {
            self.register(def, config)?;
        }
        Ok(count)
    }

    /// Load and register trains from a TOML file
    pub fn load_toml(&mut self, path: &Path) -> Result<usize> {
        let count = self.register_file(YardFile::load(path)?)?;
        info!(path = %path.display(), count, "loaded train definitions");
        Ok(count)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Check if a train is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Definition registered under `name`
    pub fn definition(&self, name: &str) -> Option<&TrainDef> {
        self.entries.get(name).map(|e| &e.def)
    }

    /// Build a fresh train by name
    pub fn build<'r>(&self, name: &str, regulator: &'r Regulator) -> Result<Train<'r, Fixture>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| YardError::UnknownTrain(name.to_string()))?;
        assemble(&entry.def, entry.config, regulator)
    }
}

fn assemble<'r>(
    def: &TrainDef,
    config: TrainConfig,
    regulator: &'r Regulator,
) -> Result<Train<'r, Fixture>> {
    if def.stages.is_empty() {
        return Err(YardError::InvalidDefinition(format!(
            "train '{}' has no stages",
            def.name
        )));
    }

    let mut train = Train::new(config, regulator)?;
    for stage in &def.stages {
        for actuator in &stage.actuators {
            train.add(actuator.instantiate()?)?;
        }
        train.build()?;
    }
    train.build_train()?;
    Ok(train)
}

fn actuator(name: &str, kind: &str, target: &[f64]) -> ActuatorDef {
    ActuatorDef {
        name: name.to_string(),
        kind: kind.to_string(),
        target: target.to_vec(),
        goal: GoalKind::Tolerance,
        tolerance: None,
        complete: false,
        update_hz: None,
        rate: None,
        steps: None,
    }
}

/// Three-stage demonstration train
///
/// Stage 0 holds two flag actuators preset complete, stage 1 a two-axis
/// slew with a strict tolerance, stage 2 a one-axis slew with a loose one.
pub fn dummy_train() -> TrainDef {
    let flagged = |name, kind, target: &[f64]| ActuatorDef {
        goal: GoalKind::Flag,
        complete: true,
        ..actuator(name, kind, target)
    };
    let slewing = |name, target: &[f64], tolerance, rate| ActuatorDef {
        tolerance: Some(ToleranceDef::Preset(tolerance)),
        rate: Some(rate),
        ..actuator(name, "slew", target)
    };

    TrainDef {
        name: DUMMY_TRAIN.to_string(),
        stages: vec![
            StageDef {
                actuators: vec![
                    flagged("foo", "passive", &[-2500.0, 3300.1]),
                    flagged("bar", "passive", &[0.1]),
                ],
            },
            StageDef {
                actuators: vec![slewing("foo", &[-2500.0, 3300.1], Tolerance::Strict, 500.0)],
            },
            StageDef {
                actuators: vec![slewing("bar", &[1.1], Tolerance::Loose, 0.5)],
            },
        ],
    }
}
