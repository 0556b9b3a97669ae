use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::StepOutcome;

/// A discrete event in a run's execution timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// Execution entered a stage.
    StepEnter {
        step: String,
        label: String,
        at: DateTime<Utc>,
    },
    /// A stage returned.
    StepExit {
        step: String,
        outcome: StepOutcome,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A stage guard evaluated to false.
    StepSkipped {
        step: String,
        guard: String,
        at: DateTime<Utc>,
    },
    /// The halt policy stopped the sequence.
    Halted {
        step: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl TimelineEvent {
    pub fn step(&self) -> &str {
        match self {
            TimelineEvent::StepEnter { step, .. }
            | TimelineEvent::StepExit { step, .. }
            | TimelineEvent::StepSkipped { step, .. }
            | TimelineEvent::Halted { step, .. } => step,
        }
    }
}

/// Sequential record of one run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TimelineEvent) {
        self.events.push(event);
    }

    /// Step numbers that were entered, in order.
    pub fn entered(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| matches!(e, TimelineEvent::StepEnter { .. }))
            .map(TimelineEvent::step)
            .collect()
    }

    /// Step numbers whose guard skipped them.
    pub fn skipped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| matches!(e, TimelineEvent::StepSkipped { .. }))
            .map(TimelineEvent::step)
            .collect()
    }
}
