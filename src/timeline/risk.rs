//! Session risk adoption
//!
//! Risk is never derived from symptom severities here; the declared value
//! from the conversational service is the only input.

use crate::types::{RiskLevel, StructuredUpdate};

pub const HIGH_RISK_GUIDANCE: &str =
    "Please seek immediate medical attention. Stay away from other people.";
pub const MODERATE_RISK_GUIDANCE: &str = "Monitor symptoms closely and contact your healthcare provider. \
     Stay at home so as not to spread any illnesses.";

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAdopter;

impl RiskAdopter {
    /// Adopt the update's declared risk, keeping `current` when none is declared
    pub fn adopt(current: RiskLevel, update: &StructuredUpdate) -> RiskLevel {
        update.risk_level.unwrap_or(current)
    }

    /// Guidance shown next to a non-low risk level
    pub fn guidance(level: RiskLevel) -> Option<&'static str> {
        match level {
            RiskLevel::High => Some(HIGH_RISK_GUIDANCE),
            RiskLevel::Moderate => Some(MODERATE_RISK_GUIDANCE),
            RiskLevel::Low => None,
        }
    }
}
