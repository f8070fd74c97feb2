//! Type definitions module
//!
//! Core types for the symptom timeline and the conversation around it.

pub mod language;
pub mod messages;
pub mod severity;
pub mod symptom;

// Re-export commonly used types
pub use language::Language;
pub use messages::{ConversationTurn, Role, StructuredUpdate, SymptomActions, SymptomObservation};
pub use severity::{RiskLevel, Severity};
pub use symptom::{canonical_name, LocalizedLabel, Symptom, SymptomSet};
