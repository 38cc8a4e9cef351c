//! Goal policies
//!
//! A goal policy decides whether an actuator has reached its goal. It is
//! a plain value dispatched through [`GoalPolicy::evaluate`]; evaluation is
//! a pure read of target, current and the external flag.

use crate::config::TolerancePresets;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allowed per-element deviation between target and current
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tolerance {
    /// The train's strict preset (0.001 by default)
    Strict,
    /// The train's loose preset (1.0 by default)
    #[default]
    Loose,
    /// An explicit epsilon
    Within(f64),
}

impl Tolerance {
    /// Resolve to a concrete epsilon
    pub fn epsilon(&self, presets: &TolerancePresets) -> f64 {
        match self {
            Tolerance::Strict => presets.strict,
            Tolerance::Loose => presets.loose,
            Tolerance::Within(epsilon) => *epsilon,
        }
    }

    /// Short name used in train summaries
    pub fn name(&self) -> &'static str {
        match self {
            Tolerance::Strict => "strict",
            Tolerance::Loose => "loose",
            Tolerance::Within(_) => "custom",
        }
    }
}

/// How an actuator decides it is complete
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GoalPolicy {
    /// Every `|target[i] - current[i]|` within the tolerance
    Converge(Tolerance),
    /// Completion is reported out-of-band; target/current are ignored
    ExternalFlag,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        GoalPolicy::Converge(Tolerance::default())
    }
}

impl GoalPolicy {
    /// Decide completion from the actuator's values
    ///
    /// Mismatched lengths never count as converged.
    pub fn evaluate(
        &self,
        presets: &TolerancePresets,
        target: &[f64],
        current: &[f64],
        flag: bool,
    ) -> bool {
        match self {
            GoalPolicy::Converge(tolerance) => {
                let epsilon = tolerance.epsilon(presets);
                target.len() == current.len()
                    && target
                        .iter()
                        .zip(current)
                        .all(|(t, c)| within(*t, *c, epsilon))
            }
            GoalPolicy::ExternalFlag => flag,
        }
    }

    /// Short name used in train summaries
    pub fn name(&self) -> &'static str {
        match self {
            GoalPolicy::Converge(_) => "tolerance",
            GoalPolicy::ExternalFlag => "flag",
        }
    }

    /// Tolerance, if this policy compares values
    pub fn tolerance(&self) -> Option<Tolerance> {
        match self {
            GoalPolicy::Converge(tolerance) => Some(*tolerance),
            GoalPolicy::ExternalFlag => None,
        }
    }
}

/// `|a - b| <= epsilon` without needing `libm`
pub fn within(a: f64, b: f64, epsilon: f64) -> bool {
    let diff = a - b;
    let diff = if diff < 0.0 { -diff } else { diff };
    diff <= epsilon
}
