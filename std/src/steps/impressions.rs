use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const SPINAL_PRECAUTIONS: &str = "C-spine stabilization + C-collar";

/// Step 3: general impression, spinal precautions and the ALS call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpressionsSpinal;

#[async_trait]
impl Step for ImpressionsSpinal {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("3", "LISA - impressions & spinal precautions")
            .reads(&["age", "sex"])
            .writes(&["interventions"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools
            .header("STEP 3: LISA - IMPRESSIONS & SPINAL PRECAUTIONS")
            .await;

        let patient = tools.patient();
        tools
            .emt(&format!(
                "'OKAY, I GOT A {}-YEAR-OLD {}, SUPINE, APPEARS UNRESPONSIVE.'",
                patient.age, patient.sex
            ))
            .await;
        tools
            .emt("'MY PARTNERS ARE INITIATING C-SPINE STABILIZATION AND APPLYING C-COLLAR.'")
            .await;
        tools.dispatch(PatientAction::intervention(SPINAL_PRECAUTIONS))?;
        tools.pause().await?;

        tools
            .emt("'I AM MAKING THE DECISION TO CALL ALS IMMEDIATELY.'")
            .await;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emtsim_test::{ScriptedToolbox, assert_narrated};

    #[tokio::test]
    async fn logs_spinal_precautions_between_two_pauses() {
        let tools = ScriptedToolbox::new(Vec::<String>::new());
        ImpressionsSpinal.execute(&tools).await.unwrap();

        assert!(tools.patient().has_intervention(SPINAL_PRECAUTIONS));
        assert_eq!(tools.pause_count(), 2);
        assert_narrated!(
            tools,
            "➤ EMT: 'OKAY, I GOT A 25-YEAR-OLD MALE, SUPINE, APPEARS UNRESPONSIVE.'",
            "➤ EMT: 'I AM MAKING THE DECISION TO CALL ALS IMMEDIATELY.'"
        );
    }
}
