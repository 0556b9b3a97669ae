use crate::error::ProtocolError;
use crate::metadata::StepMetadata;
use crate::outcome::StepOutcome;
use crate::toolbox::Toolbox;
use async_trait::async_trait;

pub type StepResult = Result<StepOutcome, ProtocolError>;

/// One unit of protocol logic: narrate, optionally gate, mutate, return.
///
/// A step receives nothing but the toolbox. It must read the record through
/// [`crate::toolbox::RecordAccess::patient`] at the point of use, never from
/// a copy taken before a gate call.
#[async_trait]
pub trait Step: Send + Sync + 'static {
    fn metadata(&self) -> StepMetadata;
    async fn execute(&self, tools: &dyn Toolbox) -> StepResult;
}
