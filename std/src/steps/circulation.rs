use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const BLANKET: &str = "Patient covered with blanket";
pub const POSITIONED: &str = "Patient positioned for comfort";
pub const SHOCK_TREATMENT: &str = "Treated for shock";

const RAPID_WEAK: &str = "RAPID/WEAK";
const PALE_COOL: &str = "PALE/COOL/DIAPHORETIC";
const ENVIRONMENTAL: &str = "TOO COLD OR HOT OUTSIDE";
const GREY_ASHY: &str = "GREY/ASHY";

/// Step 7: circulation and shock.
///
/// Shock is present when any of the pulse, skin or (environmental fallback)
/// conjunctiva findings point to poor perfusion. The verdict is always
/// written, even when negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct CirculationShock;

#[async_trait]
impl Step for CirculationShock {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("7", "Circulation (C) & shock assessment")
            .writes(&["is_in_shock", "interventions", "treatments_applied"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools
            .header("STEP 7: CIRCULATION (C) & SHOCK ASSESSMENT")
            .await;
        tools
            .emt("'I CHECK CAROTID PULSE QUALITY, SKIN SIGNS, AND COMPARE RADIAL PULSES.'")
            .await;
        tools.pause().await?;

        let pulse = tools
            .ask("Carotid pulse quality is", &[RAPID_WEAK, "NORMAL"])
            .await?;
        let skin = tools
            .ask("Skin status is", &["WARM/DRY", PALE_COOL, ENVIRONMENTAL])
            .await?;

        let mut conjunctiva = None;
        if skin == ENVIRONMENTAL {
            tools
                .system("Skin assessment unreliable due to environmental factors.")
                .await;
            tools
                .emt("'CHECKING CONJUNCTIVA (UNDER EYELIDS) FOR PERFUSION STATUS.'")
                .await;
            conjunctiva = Some(
                tools
                    .ask("Conjunctiva color is", &["PINK", GREY_ASHY])
                    .await?,
            );
        }

        let in_shock =
            pulse == RAPID_WEAK || skin == PALE_COOL || conjunctiva.as_deref() == Some(GREY_ASHY);
        tracing::debug!(%pulse, %skin, ?conjunctiva, in_shock, "Perfusion assessed");
        tools.dispatch(PatientAction::SetShock(in_shock))?;

        if in_shock {
            tools.critical("PATIENT IS LIKELY EXPERIENCING SHOCK").await;
            tools
                .emt("'PLACE PATIENT IN BLANKET, POSITION FOR COMFORT.'")
                .await;
            tools.dispatch(PatientAction::intervention(BLANKET))?;
            tools.dispatch(PatientAction::intervention(POSITIONED))?;
            tools.dispatch(PatientAction::treatment(SHOCK_TREATMENT))?;
        } else {
            tools
                .system("Circulation adequate. No immediate signs of shock.")
                .await;
        }
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}
