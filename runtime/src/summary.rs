use emtsim_core::record::PatientRecord;
use emtsim_core::toolbox::Toolbox;

/// Narrate the end-of-run patient summary from a freshly read record.
pub async fn narrate_summary(tools: &dyn Toolbox) {
    let patient = tools.patient();

    tools.header("SIMULATION COMPLETE - PATIENT SUMMARY").await;
    tools.note("Patient Status:").await;
    for line in status_lines(&patient) {
        tools.dim(&line).await;
    }

    if !patient.treatments_applied.is_empty() {
        tools.note("Treatments Applied:").await;
        for line in numbered(&patient.treatments_applied) {
            tools.dim(&line).await;
        }
    }

    tools.note("Interventions Applied:").await;
    for line in numbered(&patient.interventions) {
        tools.dim(&line).await;
    }

    tools.system("Assessment protocol completed successfully.").await;
    tools
        .dim("Review your performance and consider alternative scenarios.")
        .await;
}

fn status_lines(patient: &PatientRecord) -> Vec<String> {
    let or_unknown = |value: Option<&'static str>| value.unwrap_or("Unknown");

    let mut lines = vec![
        format!("  Age/Sex: {}yo {}", patient.age, patient.sex),
        format!(
            "  Call Type: {}",
            or_unknown(patient.call_type.as_ref().map(|c| c.as_str()))
        ),
        format!(
            "  Trauma Type: {}",
            or_unknown(patient.trauma_type.as_ref().map(|t| t.as_str()))
        ),
    ];
    if let Some(location) = patient.gsw_location {
        lines.push(format!("  GSW Location: {location}"));
    }
    lines.push(format!(
        "  AVPU: {}",
        patient
            .avpu_status
            .as_ref()
            .map_or("Not assessed", |a| a.as_str())
    ));
    lines.push(format!(
        "  Airway: {}",
        if patient.airway_patent { "Patent" } else { "Compromised" }
    ));
    lines.push(format!(
        "  Breathing: {}",
        if patient.is_breathing_adequate {
            "Adequate"
        } else {
            "Inadequate"
        }
    ));
    lines.push(format!(
        "  Shock Status: {}",
        if patient.is_in_shock { "Present" } else { "Not detected" }
    ));
    lines
}

fn numbered(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. {}", i + 1, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use emtsim_core::record::{AvpuLevel, CallType, GswLocation, TraumaType};

    #[test]
    fn status_lines_cover_unassessed_record() {
        let lines = status_lines(&PatientRecord::default());
        assert_eq!(
            lines,
            vec![
                "  Age/Sex: 25yo MALE",
                "  Call Type: Unknown",
                "  Trauma Type: Unknown",
                "  AVPU: Not assessed",
                "  Airway: Compromised",
                "  Breathing: Inadequate",
                "  Shock Status: Not detected",
            ]
        );
    }

    #[test]
    fn status_lines_include_gsw_location_when_set() {
        let patient = PatientRecord {
            call_type: Some(CallType::Trauma),
            trauma_type: Some(TraumaType::Gsw),
            gsw_location: Some(GswLocation::Chest),
            avpu_status: Some(AvpuLevel::Alert),
            airway_patent: true,
            is_in_shock: true,
            ..PatientRecord::default()
        };
        let lines = status_lines(&patient);
        assert!(lines.contains(&"  GSW Location: CHEST".to_string()));
        assert!(lines.contains(&"  AVPU: ALERT".to_string()));
        assert!(lines.contains(&"  Airway: Patent".to_string()));
        assert!(lines.contains(&"  Shock Status: Present".to_string()));
    }

    #[test]
    fn numbering_starts_at_one() {
        let items = vec!["OPA inserted".to_string(), "O2 AT 15L NRB".to_string()];
        let lines: Vec<_> = numbered(&items).collect();
        assert_eq!(lines, vec!["  1. OPA inserted", "  2. O2 AT 15L NRB"]);
    }
}
