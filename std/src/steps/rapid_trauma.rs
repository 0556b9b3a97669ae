use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const PELVIC_STABILIZATION: &str = "Pelvic stabilization initiated (if required)";
pub const LIFE_THREAT_MANAGED: &str = "Life-threatening injury managed by partner";
pub const FULL_IMMOBILIZATION: &str = "Full immobilization on backboard";

const DECAPBTLS: &str = "  D - Deformities\n  E - Contusions\n  C - Abrasions\n  A - Punctures/Penetrations\n  B - Burns\n  T - Tenderness\n  L - Lacerations\n  S - Swelling";

/// Head-to-neck-to-abdomen walk; each finding is followed by a pause.
const BODY_SURVEY: &[&str] = &[
    "CHECKING HEAD FOR SPINAL FLUID...",
    "EYES FOR EQUAL AND REACTIVE TO LIGHT...",
    "NOSE FOR LEAKAGE (SPINAL FLUID OR BLOOD)...",
    "MOUTH FOR CYANOSIS OR PURSED LIPS...",
    "NECK FOR TRACHEAL DEFORMITY...",
    "CHEST FOR REVERIFYING DRESSINGS AND SIX POINT AUSCULTATION...",
    "PALPATE ABDOMEN FOR TENDERNESS, RIGIDITY, OR DISTENTION...",
];

const POSTERIOR_SURVEY: &[&str] = &[
    "CHECK PEDAL PULSES AND SENSATION IN BOTH LEGS...'",
    "CHECK RADIAL PULSES AGAIN...",
    "ON HEADMAN'S COUNT LOG ROLL FOR BACKBOARDING. CHECKING POSTERIOR FOR ADDITIONAL INJURIES...",
    "AUSCULTATE BACK LUNGS...",
];

const YES_NO: &[&str] = &["YES", "NO"];

/// Step 9: rapid trauma assessment (DECAP-BTLS), ending in full
/// immobilization.
#[derive(Debug, Clone, Copy, Default)]
pub struct RapidTrauma;

impl RapidTrauma {
    async fn pelvis(&self, tools: &dyn Toolbox) -> Result<(), ProtocolError> {
        tools
            .emt("PELVIS FOR STABILITY (GENTLE AND SIMULTANEOUS DOWNWARD AND INWARD PRESSURE...")
            .await;
        let stable = tools.ask("Is the pelvis stable?", YES_NO).await?;
        if stable == "YES" {
            tools.emt("GENITALIA FOR BLEEDING...").await;
        } else {
            tools.critical("PELVIS UNSTABLE. MINIMIZING MOVEMENT.").await;
            tools.dispatch(PatientAction::intervention(PELVIC_STABILIZATION))?;
        }
        Ok(())
    }

    async fn injuries(&self, tools: &dyn Toolbox) -> Result<(), ProtocolError> {
        let found = tools.ask("Is there an injury found?", YES_NO).await?;
        if found != "YES" {
            return Ok(());
        }

        let severe = tools
            .ask("Is the injury immediately life-threatening?", YES_NO)
            .await?;
        if severe == "YES" {
            tools.critical("LIFE THREAT FOUND! PARTNER IS MANAGING.").await;
            tools.dispatch(PatientAction::intervention(LIFE_THREAT_MANAGED))?;
        } else {
            tools
                .system("Non-life-threatening injury found. Will dress en route.")
                .await;
        }
        tools.pause().await
    }
}

#[async_trait]
impl Step for RapidTrauma {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("9", "Rapid trauma assessment (DECAPBTLS)")
            .with_description("Head-to-toe survey, pelvis check, injury triage, backboarding")
            .writes(&["interventions"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools
            .header("STEP 9: RAPID TRAUMA ASSESSMENT (DECAPBTLS)")
            .await;
        tools
            .emt("'PERFORMING HEAD-TO-TOE ASSESSMENT EN ROUTE TO HOSPITAL OR WAITING FOR ALS'")
            .await;
        tools.dim(DECAPBTLS).await;
        tools.pause().await?;

        for finding in BODY_SURVEY {
            tools.emt(finding).await;
            tools.pause().await?;
        }

        self.pelvis(tools).await?;
        tools.emt("LEGS FOR SYMMETRY ...'").await;
        tools.pause().await?;

        self.injuries(tools).await?;

        for finding in POSTERIOR_SURVEY {
            tools.emt(finding).await;
            tools.pause().await?;
        }

        tools
            .emt("'SECURE PATIENT TO BACKBOARD WITH APPROPRIATE STRAPPING.'")
            .await;
        tools.emt("'LOAD PATIENT INTO AMBULANCE FOR TRANSPORT.'").await;
        tools.pause().await?;

        tools
            .emt("checking VITAL SIGNS en route... (blood pressure, pulse, respirations)'")
            .await;
        tools.dispatch(PatientAction::intervention(FULL_IMMOBILIZATION))?;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
