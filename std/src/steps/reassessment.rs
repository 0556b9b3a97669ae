use async_trait::async_trait;
use emtsim_core::prelude::*;

/// Step 10: reassessment during transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reassessment;

#[async_trait]
impl Step for Reassessment {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("10", "Reassessment protocol")
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 10: REASSESSMENT PROTOCOL").await;
        tools
            .emt("'REASSESS PATIENT EVERY 5 MINUTES DURING TRANSPORT.'")
            .await;
        tools.dim("  • Re-check primary assessment (ABCs)").await;
        tools.dim("  • Verify all interventions remain effective").await;
        tools.dim("  • Monitor for changes in patient condition").await;
        tools.dim("  • Adjust treatment plan as needed").await;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
