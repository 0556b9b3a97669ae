use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const BVM_VENTILATION: &str = "Ventilations assisted with BVM";

/// Step 6: breathing adequacy and oxygen.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxygenBreathing;

#[async_trait]
impl Step for OxygenBreathing {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("6", "Breathing (B) & oxygen")
            .with_description("Assess rate, depth and chest rise; assist ventilations if inadequate")
            .reads(&["trauma_type", "gsw_location"])
            .writes(&["is_breathing_adequate", "interventions"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 6: BREATHING (B) & OXYGEN").await;
        tools
            .emt("'I ASSESS RATE, DEPTH, AND EQUAL RISE AND FALL OF THE CHEST.'")
            .await;

        let adequate = tools.ask("Is breathing adequate?", &["YES", "NO"]).await?;
        if adequate == "YES" {
            tools
                .system("Breathing adequate. Continuing current oxygen therapy.")
                .await;
            tools.dispatch(PatientAction::SetBreathing(true))?;
        } else {
            tools.critical("BREATHING INADEQUATE").await;
            tools
                .emt("'ASSISTING VENTILATIONS WITH BVM AT 1 BREATH EVERY 5-6 SECONDS.'")
                .await;
            tools.dispatch(PatientAction::intervention(BVM_VENTILATION))?;
            tools.dispatch(PatientAction::SetBreathing(false))?;
        }

        if tools.patient().has_chest_gsw() {
            tools
                .emt("'RECHECKING OCCLUSIVE DRESSING FOR AIR LEAKS.'")
                .await;
        }
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
