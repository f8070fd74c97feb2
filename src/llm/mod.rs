//! Language model module
//!
//! Provides the language model service seam, an OpenAI-compatible chat
//! client, request building and the structured response parser.

pub mod client;
pub mod parser;
pub mod prompt;

use crate::errors::Result;
use async_trait::async_trait;

// Re-export commonly used types
pub use client::{ChatClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use parser::{ParsedResponse, ResponseParser};
pub use prompt::{ChatRequest, PriorTurn, DEFAULT_HISTORY_WINDOW, SYSTEM_INSTRUCTION};

/// Request/response collaborator that produces raw model text
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
