//! Conversational symptom-tracking session
//!
//! `SessionState` holds everything one session knows and changes it only
//! through synchronous transitions. `SessionController` owns the state
//! behind an async lock and talks to the language model, translation and
//! notification services on its behalf.

pub mod controller;
pub mod state;

// Re-export key types
pub use controller::{SendOutcome, SessionController, SessionServices};
pub use state::{
    AppliedReply, AssistantReply, PendingSend, RetranslationPlan, RetranslationReport,
    SessionEffect, SessionState, SymptomLocalization, TickOutcome, APOLOGY, GREETING,
};
