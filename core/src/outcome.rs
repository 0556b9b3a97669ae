use serde::{Deserialize, Serialize};
use std::fmt;

/// How a step finished.
///
/// Clinical dead ends are data, not errors: the orchestrator decides what
/// to do with them according to its halt policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Proceed to the next stage (linear flow).
    Next,

    /// The step reached a branch that is not built yet and returned
    /// without further mutation. `branch` names what was reached.
    Placeholder { branch: String },

    /// The patient died during the step (CPR unsuccessful).
    Deceased,
}

impl StepOutcome {
    pub fn placeholder(branch: impl Into<String>) -> Self {
        StepOutcome::Placeholder {
            branch: branch.into(),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Next => f.write_str("next"),
            StepOutcome::Placeholder { branch } => write!(f, "placeholder ({branch})"),
            StepOutcome::Deceased => f.write_str("patient deceased"),
        }
    }
}
