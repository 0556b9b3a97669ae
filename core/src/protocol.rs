//! # Protocol: ordered step sequences
//!
//! A [`Protocol`] is a named, ordered list of stages. Each stage wraps one
//! step and may carry a guard predicate evaluated against the committed
//! record just before the stage would run. A [`Catalog`] maps a call
//! classification to the protocol that handles it.

use crate::metadata::StepMetadata;
use crate::record::{CallType, PatientRecord, TraumaType};
use crate::step::Step;
use crate::telemetry::Traced;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingCallType,
    AwaitingTraumaType,
    RunningStepSequence,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::AwaitingCallType => "awaiting call type",
            Phase::AwaitingTraumaType => "awaiting trauma type",
            Phase::RunningStepSequence => "running step sequence",
            Phase::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Predicate deciding whether a stage runs.
pub type Guard = fn(&PatientRecord) -> bool;

#[derive(Clone)]
pub struct Stage {
    step: Arc<dyn Step>,
    guard: Option<(&'static str, Guard)>,
}

impl Stage {
    pub fn step(&self) -> &dyn Step {
        self.step.as_ref()
    }

    pub fn metadata(&self) -> StepMetadata {
        self.step.metadata()
    }

    /// Label of the guard, if the stage is conditional.
    pub fn guard_label(&self) -> Option<&'static str> {
        self.guard.map(|(label, _)| label)
    }

    /// Whether the stage should run against `record`.
    pub fn admits(&self, record: &PatientRecord) -> bool {
        self.guard.is_none_or(|(_, guard)| guard(record))
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("step", &self.step.metadata().number)
            .field("guard", &self.guard_label())
            .finish()
    }
}

/// One row of a protocol outline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageOutline {
    #[serde(flatten)]
    pub step: StepMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Protocol {
    pub name: String,
    pub description: Option<String>,
    stages: Vec<Stage>,
}

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            stages: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Append an unconditional stage.
    pub fn then<S: Step>(mut self, step: S) -> Self {
        self.stages.push(Stage {
            step: Arc::new(Traced::new(step)),
            guard: None,
        });
        self
    }

    /// Append a stage that runs only when `guard` holds for the record.
    pub fn then_if<S: Step>(mut self, step: S, label: &'static str, guard: Guard) -> Self {
        self.stages.push(Stage {
            step: Arc::new(Traced::new(step)),
            guard: Some((label, guard)),
        });
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn outline(&self) -> Vec<StageOutline> {
        self.stages
            .iter()
            .map(|stage| StageOutline {
                step: stage.metadata(),
                guard: stage.guard_label().map(str::to_string),
            })
            .collect()
    }
}

/// Call classification that selects a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolKey {
    pub call_type: CallType,
    pub trauma_type: Option<TraumaType>,
}

impl ProtocolKey {
    pub fn medical() -> Self {
        Self {
            call_type: CallType::Medical,
            trauma_type: None,
        }
    }

    pub fn trauma(trauma_type: TraumaType) -> Self {
        Self {
            call_type: CallType::Trauma,
            trauma_type: Some(trauma_type),
        }
    }
}

impl fmt::Display for ProtocolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trauma_type {
            Some(t) => write!(f, "{}/{}", self.call_type, t),
            None => write!(f, "{}", self.call_type),
        }
    }
}

/// Registry of protocols by call classification.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    protocols: HashMap<ProtocolKey, Arc<Protocol>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: ProtocolKey, protocol: Arc<Protocol>) -> Self {
        self.protocols.insert(key, protocol);
        self
    }

    pub fn get(&self, key: &ProtocolKey) -> Option<Arc<Protocol>> {
        self.protocols.get(key).cloned()
    }
}
