use async_trait::async_trait;
use emtsim_core::prelude::*;

/// Step 1: BSI, scene safety and mechanism of injury.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneSizeUp;

fn mechanism(trauma_type: Option<TraumaType>) -> &'static str {
    match trauma_type {
        Some(TraumaType::Gsw) => "GSW sustained 5 minutes ago.",
        Some(TraumaType::LadderFall) => "fell approximately 20 feet from a ladder.",
        Some(TraumaType::CarAccident) => "restrained driver in a high-speed motor vehicle collision.",
        None => "mechanism of injury not reported.",
    }
}

#[async_trait]
impl Step for SceneSizeUp {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("1", "Scene size-up & initial actions")
            .with_description("Confirm BSI and scene safety, report the mechanism of injury")
            .reads(&["age", "sex", "trauma_type"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 1: SCENE SIZE-UP & INITIAL ACTIONS").await;
        tools.system("BSI PRECAUTIONS CONFIRMED. SCENE IS SAFE.").await;

        let patient = tools.patient();
        tools
            .system(&format!(
                "MOI: {}-YEAR-OLD {}, {}",
                patient.age,
                patient.sex,
                mechanism(patient.trauma_type)
            ))
            .await;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
