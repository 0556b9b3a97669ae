use async_trait::async_trait;
use emtsim_core::prelude::*;

pub const GSW_LOCATION_PROMPT: &str = "Where is the gunshot wound?";

pub const OCCLUSIVE_DRESSING: &str = "Occlusive dressing applied to chest";
pub const CHEST_GSW_TREATMENT: &str = "Treated GSW to chest with occlusive dressing";

/// Step 2: LISA life threats. Every trauma subtype is asked for a wound
/// location; only the chest is built out and every other location is
/// reported as a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifeThreats;

#[async_trait]
impl Step for LifeThreats {
    fn metadata(&self) -> StepMetadata {
        StepMetadata::new("2", "LISA - life threats")
            .with_description("Locate and treat immediate life threats")
            .writes(&["gsw_location", "interventions", "treatments_applied"])
    }

    async fn execute(&self, tools: &dyn Toolbox) -> StepResult {
        tools.header("STEP 2: LISA - LIFE THREATS").await;

        tools.critical("Life Threat Identified: GSW").await;
        let answer = tools
            .ask(GSW_LOCATION_PROMPT, &GswLocation::tokens())
            .await?;

        let location = answer.parse::<GswLocation>().ok();
        if let Some(location) = location {
            tools.dispatch(PatientAction::SetGswLocation(location))?;
        }

        if location == Some(GswLocation::Chest) {
            tools
                .emt("'TREAT IMMEDIATELY WITH AN OCCLUSIVE DRESSING (Chest Seal).'")
                .await;
            tools.dispatch(PatientAction::intervention(OCCLUSIVE_DRESSING))?;
            tools.dispatch(PatientAction::treatment(CHEST_GSW_TREATMENT))?;
            tools.pause().await?;
            return Ok(StepOutcome::Next);
        }

        tools
            .system(&format!("{answer} GSW protocol is under development."))
            .await;
        Ok(StepOutcome::placeholder(format!("GSW to {answer}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emtsim_test::{ScriptedToolbox, assert_narrated};

    fn gsw_tools(answer: &str) -> ScriptedToolbox {
        ScriptedToolbox::new([answer])
            .seeded([PatientAction::SetTraumaType(TraumaType::Gsw)])
            .unwrap()
    }

    #[tokio::test]
    async fn chest_wound_is_sealed_and_logged() {
        let tools = gsw_tools("CHEST");
        let outcome = LifeThreats.execute(&tools).await.unwrap();

        assert_eq!(outcome, StepOutcome::Next);
        let patient = tools.patient();
        assert_eq!(patient.gsw_location, Some(GswLocation::Chest));
        assert_eq!(patient.interventions, vec![OCCLUSIVE_DRESSING]);
        assert_eq!(patient.treatments_applied, vec![CHEST_GSW_TREATMENT]);
        assert_eq!(tools.requests()[0].options, vec!["CHEST", "ABDOMEN", "ARM"]);
        assert_eq!(tools.pause_count(), 1);
    }

    #[tokio::test]
    async fn other_locations_are_placeholders_without_treatment() {
        let tools = gsw_tools("ABDOMEN");
        let outcome = LifeThreats.execute(&tools).await.unwrap();

        assert_eq!(outcome, StepOutcome::placeholder("GSW to ABDOMEN"));
        assert_narrated!(tools, "⚕ SYSTEM: ABDOMEN GSW protocol is under development.");
        let patient = tools.patient();
        assert_eq!(patient.gsw_location, Some(GswLocation::Abdomen));
        assert!(patient.interventions.is_empty());
        assert!(patient.treatments_applied.is_empty());
        assert_eq!(tools.pause_count(), 0);
    }

    #[tokio::test]
    async fn every_subtype_is_asked_for_a_location() {
        for trauma_type in [TraumaType::LadderFall, TraumaType::CarAccident] {
            let tools = ScriptedToolbox::new(["CHEST"])
                .seeded([PatientAction::SetTraumaType(trauma_type)])
                .unwrap();
            let outcome = LifeThreats.execute(&tools).await.unwrap();

            assert_eq!(outcome, StepOutcome::Next);
            assert_eq!(tools.prompts(), vec![GSW_LOCATION_PROMPT]);
            assert_eq!(tools.remaining_answers(), 0);
            assert_eq!(tools.patient().gsw_location, Some(GswLocation::Chest));
            assert!(tools.patient().has_intervention(OCCLUSIVE_DRESSING));
        }
    }

    #[tokio::test]
    async fn unknown_location_token_leaves_location_unset() {
        let tools = ScriptedToolbox::new(["LEG"])
            .pass_through()
            .seeded([PatientAction::SetTraumaType(TraumaType::Gsw)])
            .unwrap();
        let outcome = LifeThreats.execute(&tools).await.unwrap();

        assert_eq!(outcome, StepOutcome::placeholder("GSW to LEG"));
        assert_eq!(tools.patient().gsw_location, None);
    }
}
