//! # Patient Actions
//!
//! The closed set of eleven named transitions over a [`PatientRecord`] and
//! the pure reducer that applies them.
//!
//! Wire form mirrors the action names used by drivers and reports:
//! `{"type": "SET_PULSE", "payload": false}`. Decoding an unknown `type` is
//! an error; there is no identity fallback.

use crate::error::RecordError;
use crate::record::{AvpuLevel, CallType, GswLocation, PatientRecord, TraumaType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientAction {
    SetCallType(CallType),
    SetTraumaType(TraumaType),
    SetGswLocation(GswLocation),
    SetAvpu(AvpuLevel),
    SetPulse(bool),
    SetAirway(bool),
    SetBreathing(bool),
    SetShock(bool),
    AddIntervention(String),
    AddTreatment(String),
    Reset,
}

impl PatientAction {
    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            PatientAction::SetCallType(_) => "SET_CALL_TYPE",
            PatientAction::SetTraumaType(_) => "SET_TRAUMA_TYPE",
            PatientAction::SetGswLocation(_) => "SET_GSW_LOCATION",
            PatientAction::SetAvpu(_) => "SET_AVPU",
            PatientAction::SetPulse(_) => "SET_PULSE",
            PatientAction::SetAirway(_) => "SET_AIRWAY",
            PatientAction::SetBreathing(_) => "SET_BREATHING",
            PatientAction::SetShock(_) => "SET_SHOCK",
            PatientAction::AddIntervention(_) => "ADD_INTERVENTION",
            PatientAction::AddTreatment(_) => "ADD_TREATMENT",
            PatientAction::Reset => "RESET",
        }
    }

    pub fn intervention(text: impl Into<String>) -> Self {
        PatientAction::AddIntervention(text.into())
    }

    pub fn treatment(text: impl Into<String>) -> Self {
        PatientAction::AddTreatment(text.into())
    }
}

impl fmt::Display for PatientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientAction::SetCallType(v) => write!(f, "{}({})", self.name(), v),
            PatientAction::SetTraumaType(v) => write!(f, "{}({})", self.name(), v),
            PatientAction::SetGswLocation(v) => write!(f, "{}({})", self.name(), v),
            PatientAction::SetAvpu(v) => write!(f, "{}({})", self.name(), v),
            PatientAction::SetPulse(v)
            | PatientAction::SetAirway(v)
            | PatientAction::SetBreathing(v)
            | PatientAction::SetShock(v) => write!(f, "{}({})", self.name(), v),
            PatientAction::AddIntervention(v) | PatientAction::AddTreatment(v) => {
                write!(f, "{}({:?})", self.name(), v)
            }
            PatientAction::Reset => f.write_str(self.name()),
        }
    }
}

/// Apply `action` to `record`, producing the next record.
///
/// Pure: the input is consumed and either the successor or a rejection is
/// returned. `call_type`, `trauma_type` and `avpu_status` are single
/// assignment within a run; only [`PatientAction::Reset`] clears them.
pub fn apply(mut record: PatientRecord, action: PatientAction) -> Result<PatientRecord, RecordError> {
    match action {
        PatientAction::SetCallType(call_type) => {
            if record.call_type.is_some() {
                return Err(RecordError::AlreadyAssigned { field: "call_type" });
            }
            record.call_type = Some(call_type);
        }
        PatientAction::SetTraumaType(trauma_type) => {
            if record.trauma_type.is_some() {
                return Err(RecordError::AlreadyAssigned {
                    field: "trauma_type",
                });
            }
            record.trauma_type = Some(trauma_type);
        }
        PatientAction::SetGswLocation(location) => record.gsw_location = Some(location),
        PatientAction::SetAvpu(level) => {
            if record.avpu_status.is_some() {
                return Err(RecordError::AlreadyAssigned {
                    field: "avpu_status",
                });
            }
            record.avpu_status = Some(level);
        }
        PatientAction::SetPulse(v) => record.has_pulse = v,
        PatientAction::SetAirway(v) => record.airway_patent = v,
        PatientAction::SetBreathing(v) => record.is_breathing_adequate = v,
        PatientAction::SetShock(v) => record.is_in_shock = v,
        PatientAction::AddIntervention(text) => record.interventions.push(text),
        PatientAction::AddTreatment(text) => record.treatments_applied.push(text),
        PatientAction::Reset => return Ok(PatientRecord::default()),
    }
    Ok(record)
}
