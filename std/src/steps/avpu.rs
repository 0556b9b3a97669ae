use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const CPR_SUCCESS: &str = "CPR performed successfully";

const YES_NO: &[&str] = &["YES", "NO"];

/// Step 4: AVPU responsiveness.
///
/// The only step with a terminal clinical branch: unsuccessful CPR clears
/// the pulse and returns [`StepOutcome::Deceased`] without assigning AVPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvpuAssessment;

impl AvpuAssessment {
    async fn unresponsive_to_voice(&self, tools: &dyn Toolbox) -> StepResult {
        tools.emt("'PINCHING SHOULDERS AND EARLOBES...'").await;
        let pain = tools.ask("Was there a pain response?", YES_NO).await?;

        if pain == "YES" {
            tools.system("Patient responds to PAIN.").await;
            tools.dispatch(PatientAction::SetAvpu(AvpuLevel::Pain))?;
            tools.pause().await?;
            return Ok(StepOutcome::Next);
        }

        tools.emt("'CHECK CAROTID PULSE FOR LIFE SIGNS.'").await;
        let life_signs = tools.ask("Are there life signs?", YES_NO).await?;

        if life_signs == "NO" {
            return self.resuscitate(tools).await;
        }

        tools.system("Pulse present - Patient is UNRESPONSIVE.").await;
        tools.dispatch(PatientAction::SetAvpu(AvpuLevel::Unresponsive))?;
        tools.dispatch(PatientAction::SetPulse(true))?;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }

    async fn resuscitate(&self, tools: &dyn Toolbox) -> StepResult {
        tools.critical("NO LIFE SIGNS DETECTED").await;
        tools.emt("'BEGIN EMERGENCY CPR.'").await;
        let cpr = tools.ask("Is CPR successful?", YES_NO).await?;

        if cpr == "NO" {
            tools.critical("CPR UNSUCCESSFUL - PATIENT DECEASED").await;
            tools.dispatch(PatientAction::SetPulse(false))?;
            tracing::warn!("Patient deceased during AVPU assessment");
            return Ok(StepOutcome::Deceased);
        }

        tools
            .system("CPR SUCCESSFUL - Patient is UNRESPONSIVE but has pulse.")
            .await;
        tools.dispatch(PatientAction::SetAvpu(AvpuLevel::Unresponsive))?;
        tools.dispatch(PatientAction::SetPulse(true))?;
        tools.dispatch(PatientAction::intervention(CPR_SUCCESS))?;
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }

    async fn responsive(&self, tools: &dyn Toolbox) -> StepResult {
        tools
            .emt("'HI, MY NAME IS EMT SMITH, THIS IS MY PARTNER EMT JONES.'")
            .await;
        tools.emt("'CAN YOU TELL ME IF IT'S DAY OR NIGHT?'").await;
        let oriented = tools.ask("Do they answer correctly?", YES_NO).await?;

        if oriented == "YES" {
            tools.system("Patient is ALERT and oriented.").await;
            tools.dispatch(PatientAction::SetAvpu(AvpuLevel::Alert))?;
            tools.dispatch(PatientAction::SetAirway(true))?;
            tools.system("Airway is clear due to alert status.").await;
        } else {
            tools.system("Patient is VERBAL but not fully oriented.").await;
            tools.dispatch(PatientAction::SetAvpu(AvpuLevel::Verbal))?;
            tools.dispatch(PatientAction::SetAirway(true))?;
            tools.system("Airway is clear due to verbal status.").await;
        }
        tools.pause().await?;
        Ok(StepOutcome::Next)
    }
}

#[async_trait]
impl Step for AvpuAssessment {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("4", "LISA - AVPU assessment")
            .with_description("Grade responsiveness; resuscitate if there are no life signs")
            .writes(&["avpu_status", "has_pulse", "airway_patent", "interventions"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 4: LISA - AVPU ASSESSMENT").await;
        tools.emt("'HEY MAN, ARE YOU AWAKE?'").await;

        let responsive = tools.ask("Are they responsive?", YES_NO).await?;
        if responsive == "NO" {
            self.unresponsive_to_voice(tools).await
        } else {
            self.responsive(tools).await
        }
    }
}
