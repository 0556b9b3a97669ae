//! The built-in protocols and the catalog that routes calls to them.

use crate::steps::*;
use emtsim_core::prelude::*;
use std::sync::Arc;

pub const AIRWAY_GUARD: &str = "patient not alert or airway not patent";

/// Airway management is skipped only for an alert patient whose airway is
/// already patent.
pub fn needs_airway_management(record: &PatientRecord) -> bool {
    record.avpu_status != Some(AvpuLevel::Alert) || !record.airway_patent
}

/// The primary trauma assessment. Every trauma subtype runs this sequence;
/// the subtype only changes what individual steps narrate.
pub fn trauma_protocol() -> Protocol {
    Protocol::new("Trauma primary assessment")
        .with_description("Scene size-up through reassessment, with conditional airway management")
        .then(SceneSizeUp)
        .then(LifeThreats)
        .then(ImpressionsSpinal)
        .then(AvpuAssessment)
        .then_if(AirwayManagement, AIRWAY_GUARD, needs_airway_management)
        .then(OxygenBreathing)
        .then(CirculationShock)
        .then(TransportDecision)
        .then(RapidTrauma)
        .then(Vitals)
        .then(Reassessment)
}

pub fn medical_protocol() -> Protocol {
    Protocol::new("Medical assessment")
        .with_description("Not built yet")
        .then(MedicalPlaceholder)
}

/// Medical plus all three trauma subtypes, which share one protocol.
pub fn standard_catalog() -> Catalog {
    let trauma = Arc::new(trauma_protocol());
    TraumaType::ALL.iter().fold(
        Catalog::new().register(ProtocolKey::medical(), Arc::new(medical_protocol())),
        |catalog, trauma_type| catalog.register(ProtocolKey::trauma(*trauma_type), trauma.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trauma_sequence_is_fixed_with_one_guard() {
        let outline = trauma_protocol().outline();
        let numbers: Vec<_> = outline.iter().map(|row| row.step.number.as_str()).collect();
        assert_eq!(numbers, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "9b", "10"]);

        let guarded: Vec<_> = outline.iter().filter(|row| row.guard.is_some()).collect();
        assert_eq!(guarded.len(), 1);
        assert_eq!(guarded[0].step.number, "5");
        assert_eq!(guarded[0].guard.as_deref(), Some(AIRWAY_GUARD));
    }

    #[test]
    fn airway_guard_truth_table() {
        let mut record = PatientRecord::default();
        assert!(needs_airway_management(&record));

        record.avpu_status = Some(AvpuLevel::Alert);
        assert!(needs_airway_management(&record));

        record.airway_patent = true;
        assert!(!needs_airway_management(&record));

        record.avpu_status = Some(AvpuLevel::Verbal);
        assert!(needs_airway_management(&record));
    }

    #[test]
    fn every_trauma_subtype_shares_the_trauma_protocol() {
        let catalog = standard_catalog();
        let gsw = catalog.get(&ProtocolKey::trauma(TraumaType::Gsw)).unwrap();
        for trauma_type in TraumaType::ALL {
            let protocol = catalog.get(&ProtocolKey::trauma(*trauma_type)).unwrap();
            assert!(Arc::ptr_eq(&gsw, &protocol));
        }
        let medical = catalog.get(&ProtocolKey::medical()).unwrap();
        assert_eq!(medical.stages().len(), 1);
    }
}
