pub mod airway;
pub mod avpu;
pub mod breathing;
pub mod circulation;
pub mod impressions;
pub mod life_threats;
pub mod medical;
pub mod rapid_trauma;
pub mod reassessment;
pub mod scene;
pub mod transport;
pub mod vitals;

pub use airway::AirwayManagement;
pub use avpu::AvpuAssessment;
pub use breathing::OxygenBreathing;
pub use circulation::CirculationShock;
pub use impressions::ImpressionsSpinal;
pub use life_threats::LifeThreats;
pub use medical::MedicalPlaceholder;
pub use rapid_trauma::RapidTrauma;
pub use reassessment::Reassessment;
pub use scene::SceneSizeUp;
pub use transport::TransportDecision;
pub use vitals::Vitals;
