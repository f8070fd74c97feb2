//! Conversation turns and the structured update decoded from model output

use crate::types::severity::lenient_risk_level;
use crate::types::{RiskLevel, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    /// Text in the canonical working language (what the model sees)
    pub text: String,
    /// Text in the active display language, when it differs
    pub localized: Option<String>,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            localized: None,
            at,
        }
    }

    pub fn user(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(Role::User, text, at)
    }

    pub fn assistant(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(Role::Assistant, text, at)
    }

    pub fn display_text(&self) -> &str {
        self.localized.as_deref().unwrap_or(&self.text)
    }
}

/// A `{symptom, severity}` observation reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomObservation {
    #[serde(rename = "symptom", alias = "name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl SymptomObservation {
    pub fn new(name: impl Into<String>, severity: impl Into<Severity>) -> Self {
        Self {
            name: name.into(),
            severity: Some(severity.into()),
        }
    }
}

/// Explicit edits to the symptom set requested by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomActions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub add: Vec<SymptomObservation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub update: Vec<SymptomObservation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remove: Vec<String>,
}

impl SymptomActions {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }
}

/// Validated (or fallback) payload derived from one model response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredUpdate {
    /// Assistant reply text
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: Vec<SymptomObservation>,
    #[serde(
        rename = "riskLevel",
        default,
        deserialize_with = "lenient_risk_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_level: Option<RiskLevel>,
    #[serde(rename = "symptomActions", default, deserialize_with = "null_as_default")]
    pub symptom_actions: SymptomActions,
}

impl StructuredUpdate {
    /// Update carrying only a reply, with no symptom changes and no risk
    pub fn reply_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            symptoms: Vec::new(),
            risk_level: None,
            symptom_actions: SymptomActions::default(),
        }
    }

    /// Payload used when model output cannot be decoded
    pub fn fallback(raw: &str) -> Self {
        Self {
            message: raw.to_string(),
            symptoms: Vec::new(),
            risk_level: Some(RiskLevel::Low),
            symptom_actions: SymptomActions::default(),
        }
    }

    /// True when applying this update cannot change the symptom set
    pub fn has_no_symptom_changes(&self) -> bool {
        self.symptoms.is_empty() && self.symptom_actions.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
