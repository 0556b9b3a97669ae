//! Driver-agnostic core of the EMT assessment engine.
//!
//! Steps see only the [`Toolbox`]; everything they change goes through the
//! closed [`PatientAction`] set and the pure [`apply`] reducer.

pub mod action;
pub mod error;
pub mod message;
pub mod metadata;
pub mod narration;
pub mod outcome;
pub mod protocol;
pub mod record;
pub mod step;
pub mod store;
pub mod telemetry;
pub mod timeline;
pub mod toolbox;

pub use action::{PatientAction, apply};
pub use error::{ProtocolError, RecordError, RequestKind};
pub use message::{Message, MessageKind, PendingInput};
pub use metadata::StepMetadata;
pub use narration::NarrationLog;
pub use outcome::StepOutcome;
pub use protocol::{Catalog, Phase, Protocol, ProtocolKey, Stage, StageOutline};
pub use record::{AvpuLevel, CallType, GswLocation, MedicalType, PatientRecord, Sex, TraumaType};
pub use step::{Step, StepResult};
pub use store::RecordStore;
pub use timeline::{Timeline, TimelineEvent};
pub use toolbox::{ContinuationGate, InputGate, NarrationChannel, RecordAccess, Toolbox};

pub mod prelude {
    pub use crate::action::PatientAction;
    pub use crate::error::{ProtocolError, RecordError};
    pub use crate::message::MessageKind;
    pub use crate::metadata::StepMetadata;
    pub use crate::outcome::StepOutcome;
    pub use crate::protocol::{Catalog, Phase, Protocol, ProtocolKey};
    pub use crate::record::{AvpuLevel, CallType, GswLocation, PatientRecord, TraumaType};
    pub use crate::step::{Step, StepResult};
    pub use crate::toolbox::{ContinuationGate, InputGate, NarrationChannel, RecordAccess, Toolbox};
}
