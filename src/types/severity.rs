//! Severity and risk vocabularies
//!
//! The conversational service reports symptom severities with the same
//! High/Moderate/Low words it uses for risk, while caregiving advice is keyed
//! on Severe/Moderate/Mild. `Severity` is the single canonical scale and
//! accepts both spellings.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical severity of a single symptom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Severe,
    Moderate,
    Mild,
    /// Label the model used that matches nothing above; kept verbatim
    Unrecognized(String),
}

impl Severity {
    /// Parse a severity label, case-insensitively
    ///
    /// `High` and `Low` are accepted as aliases of `Severe` and `Mild`.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "severe" | "high" => Severity::Severe,
            "moderate" | "medium" => Severity::Moderate,
            "mild" | "low" => Severity::Mild,
            _ => Severity::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Severity::Severe => "Severe",
            Severity::Moderate => "Moderate",
            Severity::Mild => "Mild",
            Severity::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unrecognized(_))
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unrecognized("Unspecified".to_string())
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::parse(&label)
    }
}

impl From<&str> for Severity {
    fn from(label: &str) -> Self {
        Severity::parse(label)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.label().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall risk judgment declared by the conversational service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Moderate,
    #[default]
    Low,
}

impl RiskLevel {
    /// Parse a risk label, case-insensitively; unknown labels yield `None`
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "severe" => Some(RiskLevel::High),
            "moderate" | "medium" => Some(RiskLevel::Moderate),
            "low" | "mild" => Some(RiskLevel::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Low => "Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deserialize an optional risk level, treating unknown labels and
/// non-string values as absent
pub(crate) fn lenient_risk_level<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<RiskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| value.as_str())
        .and_then(RiskLevel::parse))
}
