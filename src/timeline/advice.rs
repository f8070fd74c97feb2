//! Severity → caregiving advice lookup

use crate::types::Severity;

pub const SEVERE_ADVICE: &str =
    "Seek immediate medical attention. Contact emergency services if needed.";
pub const MODERATE_ADVICE: &str =
    "Contact your healthcare provider for guidance. Monitor symptoms closely.";
pub const MILD_ADVICE: &str =
    "Rest and monitor your symptoms. Follow your regular treatment plan.";
pub const DEFAULT_ADVICE: &str =
    "Monitor your symptoms and consult your healthcare provider if they worsen.";

/// Pure mapping from severity to advice text
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceResolver;

impl AdviceResolver {
    pub fn resolve(severity: &Severity) -> &'static str {
        match severity {
            Severity::Severe => SEVERE_ADVICE,
            Severity::Moderate => MODERATE_ADVICE,
            Severity::Mild => MILD_ADVICE,
            Severity::Unrecognized(_) => DEFAULT_ADVICE,
        }
    }

    /// Resolve straight from a label as the model wrote it
    pub fn resolve_label(label: &str) -> &'static str {
        Self::resolve(&Severity::parse(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_exhaustive() {
        assert_eq!(AdviceResolver::resolve(&Severity::Severe), SEVERE_ADVICE);
        assert_eq!(AdviceResolver::resolve(&Severity::Moderate), MODERATE_ADVICE);
        assert_eq!(AdviceResolver::resolve(&Severity::Mild), MILD_ADVICE);
    }

    #[test]
    fn test_unrecognized_gets_default() {
        assert_eq!(AdviceResolver::resolve_label("Unbearable"), DEFAULT_ADVICE);
        assert_eq!(AdviceResolver::resolve(&Severity::default()), DEFAULT_ADVICE);
    }

    #[test]
    fn test_risk_vocabulary_aliases() {
        assert_eq!(AdviceResolver::resolve_label("High"), SEVERE_ADVICE);
        assert_eq!(AdviceResolver::resolve_label("low"), MILD_ADVICE);
    }
}
