//! # Patient Record
//!
//! The single mutable entity threaded through a run. Steps never write
//! fields directly; every change goes through [`crate::action::apply`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when an operator token does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{token}` is not a valid {kind}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

/// Declares an enum whose variants round-trip through the upper-case tokens
/// the operator selects (`"LADDER_FALL"`, `"CHEST"`, ...).
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The operator-facing token for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            /// Tokens for every variant, suitable as gate options.
            pub fn tokens() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(UnknownToken {
                        kind: $kind,
                        token: other.to_string(),
                    }),
                }
            }
        }
    };
}

token_enum! {
    Sex, "sex" {
        Male => "MALE",
        Female => "FEMALE",
    }
}

token_enum! {
    /// Top-level dispatch category of the call.
    CallType, "call type" {
        Medical => "MEDICAL",
        Trauma => "TRAUMA",
    }
}

token_enum! {
    /// Reserved for the medical branch; no current step assigns it.
    MedicalType, "medical type" {
        ChestPain => "CHEST_PAIN",
        DifficultyBreathing => "DIFF_BREATHING",
        CollapsedPatient => "COLLAPSED_PATIENT",
    }
}

token_enum! {
    TraumaType, "trauma type" {
        Gsw => "GSW",
        LadderFall => "LADDER_FALL",
        CarAccident => "CAR_ACCIDENT",
    }
}

token_enum! {
    GswLocation, "GSW location" {
        Chest => "CHEST",
        Abdomen => "ABDOMEN",
        Arm => "ARM",
    }
}

token_enum! {
    /// Alert / Verbal / Pain / Unresponsive.
    AvpuLevel, "AVPU level" {
        Alert => "ALERT",
        Verbal => "VERBAL",
        Pain => "PAIN",
        Unresponsive => "UNRESPONSIVE",
    }
}

/// Clinical state of the one simulated patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub sex: Sex,

    pub call_type: Option<CallType>,
    pub medical_type: Option<MedicalType>,
    pub trauma_type: Option<TraumaType>,
    pub gsw_location: Option<GswLocation>,

    pub avpu_status: Option<AvpuLevel>,
    pub airway_patent: bool,
    pub is_breathing_adequate: bool,
    pub has_pulse: bool,
    pub is_in_shock: bool,

    /// Append-only.
    pub interventions: Vec<String>,
    /// Append-only.
    pub treatments_applied: Vec<String>,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            age: 25,
            sex: Sex::Male,
            call_type: None,
            medical_type: None,
            trauma_type: None,
            gsw_location: None,
            avpu_status: None,
            airway_patent: false,
            is_breathing_adequate: false,
            has_pulse: true,
            is_in_shock: false,
            interventions: Vec::new(),
            treatments_applied: Vec::new(),
        }
    }
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_intervention(&self, text: &str) -> bool {
        self.interventions.iter().any(|i| i == text)
    }

    pub fn has_treatment(&self, text: &str) -> bool {
        self.treatments_applied.iter().any(|t| t == text)
    }

    /// `true` when the wound being treated is a gunshot to the chest.
    pub fn has_chest_gsw(&self) -> bool {
        self.trauma_type == Some(TraumaType::Gsw) && self.gsw_location == Some(GswLocation::Chest)
    }
}
