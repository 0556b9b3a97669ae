pub use crate::protocols::{
    AIRWAY_GUARD, medical_protocol, needs_airway_management, standard_catalog, trauma_protocol,
};
pub use crate::steps::{
    AirwayManagement, AvpuAssessment, CirculationShock, ImpressionsSpinal, LifeThreats,
    MedicalPlaceholder, OxygenBreathing, RapidTrauma, Reassessment, SceneSizeUp,
    TransportDecision, Vitals,
};
