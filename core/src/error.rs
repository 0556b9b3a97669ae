use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejections from the patient-record reducer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{field} is already assigned and cannot change within a run")]
    AlreadyAssigned { field: &'static str },
}

/// Which suspension primitive a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Input,
    Continue,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Input => f.write_str("an answer"),
            RequestKind::Continue => f.write_str("a continue signal"),
        }
    }
}

/// Faults raised by the engine itself. Clinical outcomes (death, unbuilt
/// branches) are never errors; see [`crate::outcome::StepOutcome`].
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("prompt `{prompt}` offered no options")]
    EmptyOptions { prompt: String },
    #[error("a request is already pending")]
    RequestAlreadyPending,
    #[error("no request is pending")]
    NoPendingRequest,
    #[error("the pending request expects {expected}")]
    WrongRequestKind { expected: RequestKind },
    #[error("`{token}` is not one of the offered options ({})", options.join(", "))]
    InvalidOption { token: String, options: Vec<String> },
    #[error("run abandoned while waiting for {0}")]
    Abandoned(RequestKind),
    #[error("session is busy; reset is only allowed when idle, complete or abandoned")]
    SessionBusy,
    #[error("a run needs an idle session; reset after a finished or abandoned run")]
    NotIdle,
    #[error("no protocol registered for {0}")]
    NoProtocol(String),
    #[error(transparent)]
    Record(#[from] RecordError),
}
