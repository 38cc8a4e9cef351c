//! TOML train definitions
//!
//! A definition file holds an optional `[config]` table applied to every
//! train in the file, followed by `[[train]]` entries:
//!
//! ```toml
//! [config]
//! base_loop_hz = 10
//! default_tolerance = "loose"
//!
//! [[train]]
//! name = "pick"
//! [[train.stage]]
//! [[train.stage.actuator]]
//! name = "arm"
//! kind = "slew"
//! target = [120.0, -4.5]
//! tolerance = "strict"
//! rate = 25.0
//!
//! [[train.stage.actuator]]
//! name = "settle"
//! kind = "dwell"
//! target = [0.0]
//! goal = "flag"
//! steps = 5
//! ```

use std::fs;
use std::path::Path;

use actrain_core::{Actuator, Tolerance, TolerancePresets, TrainConfig};
use actrain_drivers::{Fixture, VariantKind};
use serde::Deserialize;

use crate::error::{Result, YardError};

/// Whole definition file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YardFile {
    #[serde(default)]
    pub config: ConfigSection,
    #[serde(default, rename = "train")]
    pub trains: Vec<TrainDef>,
}

impl YardFile {
    /// Parse a definition file from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a definition file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// `[config]` overrides on top of `TrainConfig::default()`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    pub base_loop_hz: Option<u32>,
    pub default_tolerance: Option<ToleranceDef>,
    pub tolerances: Option<TolerancePresets>,
}

impl ConfigSection {
    /// Resolve into a validated `TrainConfig`
    pub fn to_train_config(&self) -> Result<TrainConfig> {
        let mut config = TrainConfig::default();
        if let Some(hz) = self.base_loop_hz {
            config.base_loop_hz = hz;
        }
        if let Some(presets) = self.tolerances {
            config.tolerances = presets;
        }
        if let Some(tolerance) = self.default_tolerance {
            config.default_tolerance = tolerance.resolve();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Tolerance as written in TOML: a preset name or a bare epsilon
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ToleranceDef {
    Preset(Tolerance),
    Epsilon(f64),
}

impl ToleranceDef {
    pub fn resolve(self) -> Tolerance {
        match self {
            ToleranceDef::Preset(t) => t,
            ToleranceDef::Epsilon(eps) => Tolerance::Within(eps),
        }
    }
}

/// Goal policy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    #[default]
    Tolerance,
    Flag,
}

/// One named train
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainDef {
    pub name: String,
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageDef>,
}

/// One stage; actuators run concurrently
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDef {
    #[serde(default, rename = "actuator")]
    pub actuators: Vec<ActuatorDef>,
}

/// One actuator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActuatorDef {
    pub name: String,
    pub kind: String,
    pub target: Vec<f64>,
    #[serde(default)]
    pub goal: GoalKind,
    pub tolerance: Option<ToleranceDef>,
    /// Flag preset for `goal = "flag"`
    #[serde(default)]
    pub complete: bool,
    pub update_hz: Option<f64>,
    /// Largest per-step move of a slew
    pub rate: Option<f64>,
    /// Step count of a dwell
    pub steps: Option<u32>,
}

impl ActuatorDef {
    /// Construct a fresh actuator from this definition
    pub fn instantiate(&self) -> Result<Actuator<Fixture>> {
        let kind: VariantKind = self.kind.parse().map_err(|source| YardError::Variant {
            name: self.name.clone(),
            source,
        })?;
        if self.goal == GoalKind::Flag && self.tolerance.is_some() {
            return Err(YardError::InvalidDefinition(format!(
                "actuator '{}': tolerance given for a flag goal",
                self.name
            )));
        }

        let param = match kind {
            VariantKind::Slew if self.steps.is_none() => self.rate,
            VariantKind::Dwell if self.rate.is_none() => self.steps.map(f64::from),
            VariantKind::Passive if self.rate.is_none() && self.steps.is_none() => None,
            _ => {
                return Err(YardError::InvalidDefinition(format!(
                    "actuator '{}': parameter not accepted by kind '{}'",
                    self.name, kind
                )))
            }
        };
        let fixture = kind.build(param).map_err(|source| YardError::Variant {
            name: self.name.clone(),
            source,
        })?;
        let actuator_err = |source| YardError::Actuator {
            name: self.name.clone(),
            source,
        };

        let mut actuator = Actuator::new(&self.name, &self.target, fixture).map_err(actuator_err)?;
        actuator = match (self.goal, self.tolerance) {
            (GoalKind::Flag, _) => actuator.with_external_flag(self.complete),
            (GoalKind::Tolerance, Some(t)) => actuator.with_tolerance(t.resolve()),
            (GoalKind::Tolerance, None) => actuator,
        };
        if let Some(hz) = self.update_hz {
            actuator = actuator.with_update_hz(hz).map_err(actuator_err)?;
        }
        Ok(actuator)
    }
}
