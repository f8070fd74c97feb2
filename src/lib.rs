//! EpiGuard - conversational symptom tracker
//!
//! A chat session with a language model that keeps a 24-hour symptom
//! timeline, follows the risk level the model declares, reminds the user
//! to check in, and can present everything in English, Spanish or French.
//!
//! # Architecture
//!
//! - **types**: turns, structured updates, symptoms, severities, languages
//! - **llm**: language model seam, chat client, prompt and response parsing
//! - **timeline**: advice lookup, reconciliation, risk adoption
//! - **translation**: fail-soft translation of inbound and outbound text
//! - **reminder**: due-time tracking and the background ticker
//! - **session**: session state and the async controller tying it together

pub mod clock;
pub mod config;
pub mod errors;
pub mod llm;
pub mod notify;
pub mod reminder;
pub mod session;
pub mod telemetry;
pub mod timeline;
pub mod translation;
pub mod types;

// Interface layer
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use errors::{Result, TrackerError};
pub use session::{SessionController, SessionState};
