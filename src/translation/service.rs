//! Translation service seam and the model-backed translator

use crate::errors::{Result, TrackerError};
use crate::llm::{ChatRequest, LanguageModelService, ResponseParser};
use crate::types::Language;
use async_trait::async_trait;
use std::sync::Arc;

/// Instruction used for translation requests
pub const TRANSLATION_INSTRUCTION: &str =
    "You are a medical translation engine. Translate the text you are given faithfully \
     and reply with the translation only.";

/// Request/response collaborator that translates one text
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String>;
}

/// Translator that asks the language model service
#[derive(Clone)]
pub struct LlmTranslator {
    llm: Arc<dyn LanguageModelService>,
}

impl LlmTranslator {
    pub fn new(llm: Arc<dyn LanguageModelService>) -> Self {
        Self { llm }
    }

    fn request(text: &str, target: Language) -> ChatRequest {
        ChatRequest::standalone(
            format!("Translate the following text to {}: {}", target.name(), text),
            TRANSLATION_INSTRUCTION,
        )
    }
}

#[async_trait]
impl TranslationService for LlmTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        let raw = self
            .llm
            .complete(&Self::request(text, target))
            .await
            .map_err(|e| TrackerError::Translation(e.to_string()))?;

        // Models primed for the chat schema sometimes wrap the answer in it.
        let translated = match ResponseParser::try_parse(&raw) {
            Ok(update) => update.message,
            Err(_) => raw,
        };

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(TrackerError::Translation("empty translation".to_string()));
        }
        Ok(translated.to_string())
    }
}
