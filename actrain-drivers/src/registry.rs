//! Variant lookup by name
//!
//! Train definitions name their actuator kind as a string plus one
//! optional numeric parameter. The registry turns that pair into a
//! [`Fixture`].

use core::fmt;
use core::str::FromStr;

use crate::dwell::Dwell;
use crate::fixture::Fixture;
use crate::passive::Passive;
use crate::slew::Slew;

/// Default per-step move for a slew with no parameter
pub const DEFAULT_SLEW_RATE: f64 = 1.0;

/// Default step count for a dwell with no parameter
pub const DEFAULT_DWELL_STEPS: u32 = 1;

/// Errors raised while building a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VariantError {
    /// Kind string matches no known variant
    UnknownKind,
    /// Parameter out of range for the variant
    InvalidParameter,
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantError::UnknownKind => f.write_str("unknown actuator kind"),
            VariantError::InvalidParameter => f.write_str("invalid actuator parameter"),
        }
    }
}

impl core::error::Error for VariantError {}

/// Known actuator variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VariantKind {
    Slew,
    Dwell,
    Passive,
}

impl VariantKind {
    /// Every variant, in registry order
    pub const ALL: [VariantKind; 3] = [VariantKind::Slew, VariantKind::Dwell, VariantKind::Passive];

    /// Name used in train definitions
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::Slew => "slew",
            VariantKind::Dwell => "dwell",
            VariantKind::Passive => "passive",
        }
    }

    /// Build a fresh variant
    ///
    /// `param` is the slew rate or the dwell step count, which must be a
    /// whole number; passive takes none and ignores it.
    pub fn build(self, param: Option<f64>) -> Result<Fixture, VariantError> {
        match self {
            VariantKind::Slew => {
                let rate = param.unwrap_or(DEFAULT_SLEW_RATE);
                Slew::new(rate)
                    .map(Fixture::Slew)
                    .ok_or(VariantError::InvalidParameter)
            }
            VariantKind::Dwell => {
                let steps = match param {
                    None => DEFAULT_DWELL_STEPS,
                    Some(p) => whole_steps(p).ok_or(VariantError::InvalidParameter)?,
                };
                Ok(Fixture::Dwell(Dwell::new(steps)))
            }
            VariantKind::Passive => Ok(Fixture::Passive(Passive::new())),
        }
    }
}

/// Exact non-negative integer step count, rejecting fractions
fn whole_steps(param: f64) -> Option<u32> {
    if !param.is_finite() || param < 0.0 || param > u32::MAX as f64 {
        return None;
    }
    let steps = param as u32;
    (steps as f64 == param).then_some(steps)
}

impl FromStr for VariantKind {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(VariantError::UnknownKind)
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
