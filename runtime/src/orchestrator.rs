//! # Orchestrator
//!
//! Drives one patient run: welcome banner, call classification, protocol
//! lookup, stage-by-stage execution with guards and the halt policy, and
//! the closing summary. It talks to the outside world only through the
//! [`Toolbox`] it is handed.

use crate::config::HaltPolicy;
use crate::summary::narrate_summary;
use chrono::Utc;
use emtsim_core::action::PatientAction;
use emtsim_core::error::ProtocolError;
use emtsim_core::message::MessageKind;
use emtsim_core::outcome::StepOutcome;
use emtsim_core::protocol::{Catalog, Phase, Protocol, ProtocolKey};
use emtsim_core::record::{CallType, PatientRecord, TraumaType};
use emtsim_core::timeline::{Timeline, TimelineEvent};
use emtsim_core::toolbox::Toolbox;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const CALL_TYPE_PROMPT: &str = "What type of call is this?";
pub const TRAUMA_TYPE_PROMPT: &str = "What type of trauma call?";

/// Pause between the welcome banner and the first prompt.
pub const WELCOME_DELAY: Duration = Duration::from_millis(800);

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stage ran (or was skipped by its guard) and the summary was narrated.
    Completed,
    /// The halt policy stopped the sequence after `step`.
    Halted { step: String, reason: String },
    /// The call classification has no built protocol.
    NotImplemented { reason: String },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => f.write_str("completed"),
            RunOutcome::Halted { step, reason } => write!(f, "halted after step {step}: {reason}"),
            RunOutcome::NotImplemented { reason } => write!(f, "not implemented: {reason}"),
        }
    }
}

/// Everything a driver may want to keep from a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub record: PatientRecord,
    pub journal: Vec<PatientAction>,
    pub timeline: Timeline,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

struct Halt {
    step: String,
    reason: String,
}

pub struct Orchestrator {
    catalog: Catalog,
    halt: HaltPolicy,
}

impl Orchestrator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            halt: HaltPolicy::default(),
        }
    }

    pub fn with_halt_policy(mut self, halt: HaltPolicy) -> Self {
        self.halt = halt;
        self
    }

    /// Run one patient from the welcome banner to `Complete`.
    ///
    /// The toolbox must be idle: a finished run has to be reset first.
    /// Engine faults (an abandoned gate, a rejected dispatch, a missing
    /// protocol) end the run early with an error and leave the toolbox in a
    /// terminal state; clinical dead ends are reported through [`RunOutcome`].
    pub async fn run(&self, tools: &dyn Toolbox) -> Result<RunReport, ProtocolError> {
        tools.begin_run()?;

        let run_id = Uuid::new_v4();
        let span = info_span!("Run", emtsim.run = %run_id);
        let result = self.execute(run_id, tools).instrument(span).await;
        if let Err(error) = &result {
            tools.fail_run(error);
        }
        result
    }

    async fn execute(&self, run_id: Uuid, tools: &dyn Toolbox) -> Result<RunReport, ProtocolError> {
        let mut timeline = Timeline::new();
        tools.enter_phase(Phase::AwaitingCallType);

        tools.header("EMT PRIMARY ASSESSMENT SIMULATOR").await;
        tools
            .narrate(
                "Emergency Medical Services Training",
                MessageKind::Header,
                WELCOME_DELAY,
            )
            .await;

        let answer = tools.ask(CALL_TYPE_PROMPT, &CallType::tokens()).await?;
        let outcome = match answer.parse::<CallType>() {
            Ok(CallType::Medical) => {
                tools.dispatch(PatientAction::SetCallType(CallType::Medical))?;
                self.run_medical(tools, &mut timeline).await?
            }
            Ok(CallType::Trauma) => {
                tools.dispatch(PatientAction::SetCallType(CallType::Trauma))?;
                self.run_trauma(tools, &mut timeline).await?
            }
            Err(unknown) => {
                tracing::warn!(error = %unknown, "Unrecognised call type; continuing with trauma");
                self.run_trauma(tools, &mut timeline).await?
            }
        };

        tools.enter_phase(Phase::Complete);
        tracing::info!(%outcome, "Run finished");

        Ok(RunReport {
            run_id,
            outcome,
            record: tools.patient(),
            journal: tools.journal(),
            timeline,
        })
    }

    async fn run_medical(
        &self,
        tools: &dyn Toolbox,
        timeline: &mut Timeline,
    ) -> Result<RunOutcome, ProtocolError> {
        let protocol = self.protocol_for(ProtocolKey::medical())?;
        tools.enter_phase(Phase::RunningStepSequence);
        // Never halted: the whole branch is reported as not implemented.
        self.run_sequence(&protocol, HaltPolicy::default(), tools, timeline)
            .await?;
        Ok(RunOutcome::NotImplemented {
            reason: format!("{} protocol", CallType::Medical),
        })
    }

    async fn run_trauma(
        &self,
        tools: &dyn Toolbox,
        timeline: &mut Timeline,
    ) -> Result<RunOutcome, ProtocolError> {
        tools.enter_phase(Phase::AwaitingTraumaType);
        let answer = tools
            .ask(TRAUMA_TYPE_PROMPT, &TraumaType::tokens())
            .await?;

        let trauma_type = match answer.parse::<TraumaType>() {
            Ok(trauma_type) => trauma_type,
            Err(unknown) => {
                tracing::warn!(error = %unknown, "Unrecognised trauma type");
                tools
                    .system(&format!("{answer} trauma protocol is under development."))
                    .await;
                return Ok(RunOutcome::NotImplemented {
                    reason: format!("{answer} trauma protocol"),
                });
            }
        };
        tools.dispatch(PatientAction::SetTraumaType(trauma_type))?;

        let protocol = self.protocol_for(ProtocolKey::trauma(trauma_type))?;
        tools.enter_phase(Phase::RunningStepSequence);

        let outcome = match self.run_sequence(&protocol, self.halt, tools, timeline).await? {
            None => RunOutcome::Completed,
            Some(Halt { step, reason }) => {
                tools
                    .system(&format!("Protocol halted after step {step}: {reason}."))
                    .await;
                RunOutcome::Halted { step, reason }
            }
        };

        narrate_summary(tools).await;
        Ok(outcome)
    }

    fn protocol_for(&self, key: ProtocolKey) -> Result<Arc<Protocol>, ProtocolError> {
        self.catalog
            .get(&key)
            .ok_or_else(|| ProtocolError::NoProtocol(key.to_string()))
    }

    /// Execute stages in order. Guards see the record as committed when the
    /// stage is reached.
    async fn run_sequence(
        &self,
        protocol: &Protocol,
        halt: HaltPolicy,
        tools: &dyn Toolbox,
        timeline: &mut Timeline,
    ) -> Result<Option<Halt>, ProtocolError> {
        tracing::debug!(protocol = %protocol.name, stages = protocol.stages().len(), "Running protocol");

        for stage in protocol.stages() {
            let meta = stage.metadata();

            if !stage.admits(&tools.patient()) {
                let guard = stage.guard_label().unwrap_or_default().to_string();
                tracing::debug!(step = %meta.number, %guard, "Stage skipped by guard");
                timeline.push(TimelineEvent::StepSkipped {
                    step: meta.number,
                    guard,
                    at: Utc::now(),
                });
                continue;
            }

            timeline.push(TimelineEvent::StepEnter {
                step: meta.number.clone(),
                label: meta.label.clone(),
                at: Utc::now(),
            });
            let start = Instant::now();
            let outcome = stage.step().execute(tools).await?;
            timeline.push(TimelineEvent::StepExit {
                step: meta.number.clone(),
                outcome: outcome.clone(),
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                at: Utc::now(),
            });

            if let Some(reason) = halt_reason(halt, &outcome) {
                timeline.push(TimelineEvent::Halted {
                    step: meta.number.clone(),
                    reason: reason.clone(),
                    at: Utc::now(),
                });
                return Ok(Some(Halt {
                    step: meta.number,
                    reason,
                }));
            }
        }
        Ok(None)
    }
}

fn halt_reason(halt: HaltPolicy, outcome: &StepOutcome) -> Option<String> {
    match outcome {
        StepOutcome::Deceased if halt.on_death => Some("patient deceased".to_string()),
        StepOutcome::Placeholder { branch } if halt.on_placeholder => {
            Some(format!("{branch} is not implemented"))
        }
        _ => None,
    }
}
