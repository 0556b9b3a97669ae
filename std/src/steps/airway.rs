use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const SUCTIONING: &str = "Airway suctioning performed";
pub const MANUAL_CLEARANCE: &str = "Manual airway clearance";
pub const OPA_INSERTED: &str = "OPA inserted";
pub const HIGH_FLOW_O2: &str = "O2 AT 15L NRB";
pub const NPA_O2: &str = "O2 AT 6L NPA";

/// Step 5: open, clear and secure the airway. Runs only when the patient is
/// not alert or the airway is not yet patent; always ends with the airway
/// marked patent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AirwayManagement;

#[async_trait]
impl Step for AirwayManagement {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("5", "Airway (A) management")
            .with_description("Jaw-thrust, clear the airway, insert an adjunct, start oxygen")
            .writes(&["interventions", "airway_patent"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 5: AIRWAY (A) MANAGEMENT").await;
        tools
            .emt("'OPEN AIRWAY USING JAW-THRUST MANEUVER (trauma suspected).'")
            .await;
        tools.pause().await?;

        let airway = tools
            .ask("What is the airway status?", &["CLEAR", "GURGLE", "DEBRIS"])
            .await?;
        match airway.as_str() {
            "GURGLE" => {
                tools
                    .emt("'I SUCTION FLUIDS IN A CIRCULAR MOTION FOR NO MORE THAN 15 SECONDS.'")
                    .await;
                tools.dispatch(PatientAction::intervention(SUCTIONING))?;
                tools.pause().await?;
            }
            "DEBRIS" => {
                tools
                    .emt("'I USE A GLOVED FINGER TO SWEEP AND REMOVE VISIBLE DEBRIS.'")
                    .await;
                tools.dispatch(PatientAction::intervention(MANUAL_CLEARANCE))?;
                tools.pause().await?;
            }
            _ => {}
        }

        tools
            .emt("'I MEASURE AND INSERT THE OROPHARYNGEAL AIRWAY (OPA).'")
            .await;
        let opa = tools
            .ask(
                "Does the patient tolerate the OPA (no gag reflex)?",
                &["YES", "NO"],
            )
            .await?;

        if opa == "YES" {
            tools.emt("'OPA ACCEPTED AND SECURED.'").await;
            tools.dispatch(PatientAction::intervention(OPA_INSERTED))?;
            tools
                .emt("'I ADMINISTER HIGH-FLOW OXYGEN AT 15 LPM AND VENTILATE 1 BREATH EVERY 5-6 SECONDS.'")
                .await;
            tools.dispatch(PatientAction::intervention(HIGH_FLOW_O2))?;
        } else {
            tools
                .emt("'OPA NOT TOLERATED. REMOVING OPA AND SWITCHING TO NPA.'")
                .await;
            tools.emt("'I ADMINISTER OXYGEN AT 6 LPM.'").await;
            tools.dispatch(PatientAction::intervention(NPA_O2))?;
        }
        tools.pause().await?;

        tools.dispatch(PatientAction::SetAirway(true))?;
        Ok(StepOutcome::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emtsim_test::ScriptedToolbox;

    async fn run(status: &str, opa: &str) -> PatientRecord {
        let tools = ScriptedToolbox::new([status, opa]);
        let outcome = AirwayManagement.execute(&tools).await.unwrap();
        assert_eq!(outcome, StepOutcome::Next);
        tools.patient()
    }

    #[tokio::test]
    async fn airway_is_patent_on_every_branch() {
        for status in ["CLEAR", "GURGLE", "DEBRIS"] {
            for opa in ["YES", "NO"] {
                assert!(run(status, opa).await.airway_patent, "{status}/{opa}");
            }
        }
    }

    #[tokio::test]
    async fn gurgle_with_opa_logs_suction_then_adjunct() {
        let patient = run("GURGLE", "YES").await;
        assert_eq!(patient.interventions, vec![SUCTIONING, OPA_INSERTED, HIGH_FLOW_O2]);
    }

    #[tokio::test]
    async fn debris_with_npa_fallback() {
        let patient = run("DEBRIS", "NO").await;
        assert_eq!(patient.interventions, vec![MANUAL_CLEARANCE, NPA_O2]);
    }

    #[tokio::test]
    async fn clear_airway_pauses_twice() {
        let tools = ScriptedToolbox::new(["CLEAR", "YES"]);
        AirwayManagement.execute(&tools).await.unwrap();
        assert_eq!(tools.pause_count(), 2);
        assert_eq!(tools.snapshots().last().map(|r| r.airway_patent), Some(true));
    }
}
