//! Translation module
//!
//! The translation service seam, an implementation backed by the language
//! model, and the fail-soft orchestrator used by the session.

pub mod orchestrator;
pub mod service;

// Re-export commonly used types
pub use orchestrator::TranslationOrchestrator;
pub use service::{LlmTranslator, TranslationService, TRANSLATION_INSTRUCTION};
