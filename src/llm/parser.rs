//! Structured response parser
//!
//! Decodes raw model output into a `StructuredUpdate`. Decoding never fails
//! outward: unstructured prose becomes a fallback update whose message is
//! the raw text, so the conversation carries on.

use crate::errors::{Result, TrackerError};
use crate::types::StructuredUpdate;
use tracing::warn;

/// Result of parsing one model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub update: StructuredUpdate,
    /// False when the fallback payload was substituted
    pub structured: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Decode and validate, reporting why decoding failed
    pub fn try_parse(raw: &str) -> Result<StructuredUpdate> {
        let update: StructuredUpdate = serde_json::from_str(raw)
            .map_err(|e| TrackerError::MalformedResponse(e.to_string()))?;

        if update.message.trim().is_empty() {
            return Err(TrackerError::MalformedResponse(
                "message is missing or empty".to_string(),
            ));
        }

        Ok(update)
    }

    /// Decode model output, substituting the fallback update on any failure
    pub fn parse(raw: &str) -> ParsedResponse {
        match Self::try_parse(raw) {
            Ok(update) => ParsedResponse {
                update,
                structured: true,
            },
            Err(e) => {
                warn!(error = %e, "model output was not a structured update; using fallback");
                ParsedResponse {
                    update: StructuredUpdate::fallback(raw),
                    structured: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RiskLevel, Severity};

    #[test]
    fn test_structured_response() {
        let raw = r#"{"message":"Rest up.","symptoms":[{"symptom":"fatigue","severity":"Low"}],"riskLevel":"Low","symptomActions":{"add":[],"update":[],"remove":[]}}"#;
        let parsed = ResponseParser::parse(raw);

        assert!(parsed.structured);
        assert_eq!(parsed.update.message, "Rest up.");
        assert_eq!(parsed.update.symptoms[0].severity, Some(Severity::Mild));
    }

    #[test]
    fn test_prose_falls_back() {
        let raw = "I'm sorry you're not feeling well. Can you tell me more?";
        let parsed = ResponseParser::parse(raw);

        assert!(!parsed.structured);
        assert_eq!(parsed.update.message, raw);
        assert!(parsed.update.symptoms.is_empty());
        assert!(parsed.update.symptom_actions.is_empty());
        assert_eq!(parsed.update.risk_level, Some(RiskLevel::Low));
    }

    #[test]
    fn test_empty_message_falls_back() {
        let raw = r#"{"message": "   ", "symptoms": []}"#;
        let parsed = ResponseParser::parse(raw);
        assert!(!parsed.structured);
        assert_eq!(parsed.update.message, raw);
    }

    #[test]
    fn test_wrong_shape_falls_back() {
        let raw = r#"{"message": "hi", "symptoms": "headache"}"#;
        assert!(matches!(
            ResponseParser::try_parse(raw),
            Err(TrackerError::MalformedResponse(_))
        ));
        assert!(!ResponseParser::parse(raw).structured);
    }

    #[test]
    fn test_truncated_json_falls_back_verbatim() {
        let raw = "{\"message\": \"cut off";
        let parsed = ResponseParser::parse(raw);
        assert_eq!(parsed.update.message, raw);
    }
}
