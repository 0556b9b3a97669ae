use async_trait::async_trait;
use emtsim_core::prelude::*;

/// Stand-in for the medical branch, which has no assessment steps yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicalPlaceholder;

#[async_trait]
impl Step for MedicalPlaceholder {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("M", "Medical protocol")
            .with_description("Announces that the medical branch is not built")
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("MEDICAL PROTOCOL").await;
        tools.system("Medical protocol is under development.").await;
        tools
            .system("This branch will be implemented in a future update.")
            .await;
        Ok(StepOutcome::placeholder("medical protocol"))
    }
}
