//! OpenAI-compatible chat client
//!
//! Sends one non-streaming request per chat turn:
//! - Endpoint: POST {base_url}/v1/chat/completions
//! - Messages: system instruction, prior turns, then the user message
//! - Single attempt; failures go back to the caller untouched

use crate::errors::{Result, TrackerError};
use crate::llm::{ChatRequest, LanguageModelService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Chat completions client
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    /// Create client with default endpoint and model
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Create client with custom configuration
    pub fn with_config(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().build().map_err(TrackerError::HttpError)?;

        if api_key.is_none() {
            warn!(base_url, "no API key configured; requests are sent unauthenticated");
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completion_body(&self, request: &ChatRequest) -> CompletionRequest {
        let mut messages = Vec::with_capacity(request.prior_turns.len() + 2);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: request.system_instruction.clone(),
        });
        messages.extend(request.prior_turns.iter().map(|turn| WireMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }));
        messages.push(WireMessage {
            role: "user".to_string(),
            content: request.user_message.clone(),
        });

        CompletionRequest {
            model: self.model.clone(),
            messages,
        }
    }
}

#[async_trait]
impl LanguageModelService for ChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.completion_body(request);
        debug!(model = %self.model, turns = body.messages.len(), "sending chat completion");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TrackerError::LanguageModel(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrackerError::LanguageModel(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::LanguageModel(format!("Failed to decode response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| TrackerError::LanguageModel("Response contained no content".to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PriorTurn;
    use crate::types::Role;

    #[test]
    fn test_client_creation() {
        let client = ChatClient::new(Some("sk-test".to_string())).unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ChatClient::with_config("http://localhost:11434/", "llama3", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model(), "llama3");
    }

    #[test]
    fn test_message_order() {
        let client = ChatClient::new(None).unwrap();
        let request = ChatRequest {
            user_message: "I feel dizzy".to_string(),
            prior_turns: vec![PriorTurn {
                role: Role::Assistant,
                content: "Hi, how are you feeling today?".to_string(),
            }],
            system_instruction: "persona".to_string(),
        };

        let body = client.completion_body(&request);
        let roles: Vec<&str> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert_eq!(body.messages[2].content, "I feel dizzy");
    }

    #[test]
    fn test_completion_response_decoding() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"message\":\"hi\"}"}}]}"#;
        let decoded: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            decoded.choices[0].message.content.as_deref(),
            Some("{\"message\":\"hi\"}")
        );
    }
}
