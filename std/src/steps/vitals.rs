use async_trait::async_trait;
use emtsim_core::prelude::*;

/// Step 9b: a full set of vitals. Narration only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vitals;

const VITALS: &[&str] = &[
    "BLOOD PRESSURE IS AS FOLLOWS...",
    "PULSE IS AS FOLLOWS...",
    "RESPIRATIONS ARE AS FOLLOWS...",
    "OXYGEN SATURATION IS AS FOLLOWS...",
    "SKIN IS AS FOLLOWS...",
];

#[async_trait]
impl Step for Vitals {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("9b", "Vital signs")
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 9B: VITAL SIGNS").await;
        tools.emt("'I'M TAKING A FULL SET OF VITALS NOW.'").await;
        tools.pause().await?;

        for reading in VITALS {
            tools.emt(reading).await;
            tools.pause().await?;
        }
        Ok(StepOutcome::Next)
    }
}
