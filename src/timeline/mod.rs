//! Symptom timeline module
//!
//! Advice lookup, the reconciliation pass that merges a structured update
//! into the symptom set, and adoption of the declared risk level.

pub mod advice;
pub mod reconciler;
pub mod risk;

// Re-export commonly used types
pub use advice::{AdviceResolver, DEFAULT_ADVICE, MILD_ADVICE, MODERATE_ADVICE, SEVERE_ADVICE};
pub use reconciler::{ReconcileStats, Reconciliation, TimelineReconciler, EVICTION_WINDOW_HOURS};
pub use risk::{RiskAdopter, HIGH_RISK_GUIDANCE, MODERATE_RISK_GUIDANCE};
