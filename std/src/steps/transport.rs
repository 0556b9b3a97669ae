use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const SHOCK_PROTOCOL: &str = "Shock protocol initiated";

/// Step 8: load-and-go decision and radio report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportDecision;

#[async_trait]
impl Step for TransportDecision {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("8", "Transport decision & communication")
            .reads(&["is_in_shock"])
            .writes(&["interventions"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools
            .header("STEP 8: TRANSPORT DECISION & COMMUNICATION")
            .await;

        if tools.patient().is_in_shock {
            tools.critical("INITIATING SHOCK PROTOCOL").await;
            tools
                .emt("'PREPARE FOR RAPID TRANSPORT - THIS IS A LOAD-AND-GO.'")
                .await;
            tools.dispatch(PatientAction::intervention(SHOCK_PROTOCOL))?;
            tools.emt("'CONTROL, THIS IS MEDIC 5. REQUESTING ALS.'").await;
            tools
                .emt("'WE HAVE A HIGH-PRIORITY TRAUMA WITH SIGNS OF SHOCK. ETA 8 MINUTES.'")
                .await;
        } else {
            tools
                .system("No immediate shock signs, but rapid transport indicated due to MOI.")
                .await;
            tools
                .emt("'PREPARING FOR RAPID TRANSPORT BASED ON MECHANISM OF INJURY.'")
                .await;
        }
        tools.pause().await?;

        tools
            .emt("'CHECK BYSTANDERS FOR SAMPLE HISTORY AND PATIENT FOR MEDICAL ALERT JEWELRY.'")
            .await;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
