//! Diagnostic train dump

use core::fmt;

use super::scheduler::Train;
use crate::actuator::Effector;
use crate::goal::{GoalPolicy, Tolerance};

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Display adapter listing every sealed stage and its actuators
///
/// Not used by the scheduler; for logs and the command line.
pub struct Summary<'a, 'r, E> {
    train: &'a Train<'r, E>,
}

impl<'a, 'r, E: Effector> Summary<'a, 'r, E> {
    pub(crate) fn new(train: &'a Train<'r, E>) -> Self {
        Self { train }
    }
}

impl<E: Effector> fmt::Display for Summary<'_, '_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "{{Train summary}}")?;
        for (index, stage) in self.train.stages().iter().enumerate() {
            writeln!(f, "[ Stage {} ]", index)?;
            for id in stage.members() {
                let actuator = &self.train.actuators()[id.index()];
                let policy = actuator.policy();
                write!(
                    f,
                    "  [Actuator]:{}, [Goal]:{}, [Criterion]:",
                    actuator.name(),
                    policy.name()
                )?;
                match policy {
                    GoalPolicy::Converge(Tolerance::Within(epsilon)) => {
                        write!(f, "custom({})", epsilon)?
                    }
                    GoalPolicy::Converge(tolerance) => f.write_str(tolerance.name())?,
                    GoalPolicy::ExternalFlag => f.write_str("none")?,
                }
                f.write_str(", [Target]:")?;
                for (i, value) in actuator.target().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "{}", RULE)
    }
}
