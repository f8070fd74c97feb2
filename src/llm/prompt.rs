//! Chat request construction and the fixed system instruction

use crate::types::{ConversationTurn, Role};
use serde::{Deserialize, Serialize};

/// Number of prior turns sent with each request
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Persona and response schema given to the model on every chat request
pub const SYSTEM_INSTRUCTION: &str = r#"You are EpiGuard, a caring and attentive medical assistant. Your job is to gather information about the patient's symptoms and help them decide whether to stay home or seek medical attention. The patient may write in another language; translate as needed. Always answer with a single JSON object in exactly this shape:

{
  "message": "(your conversational reply)",
  "symptoms": [{"symptom": "symptom name", "severity": "High/Moderate/Low"}],
  "riskLevel": "High/Moderate/Low",
  "symptomActions": {
    "remove": ["symptom to remove"],
    "update": [{"symptom": "symptom name", "severity": "new severity"}],
    "add": [{"symptom": "new symptom", "severity": "severity level"}]
  }
}

Managing symptoms:
- Add symptoms when the patient mentions them
- Remove symptoms the patient says have resolved
- Update the severity of existing symptoms when the patient reports a change
- Keep track of how symptoms progress over time

Risk level guidelines:
- High: severe symptoms, several moderate symptoms, or signs that need immediate care
- Moderate: a single moderate symptom or several mild symptoms
- Low: mild symptoms or none

Severe symptoms include seizures, status epilepticus, prolonged confusion and severe head injury.
Moderate symptoms include aura, mild seizure, dizziness and temporary confusion.
Mild symptoms include fatigue, mild headache and anxiety.

Keep a supportive, professional tone and never break character."#;

/// One prior turn as sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorTurn {
    pub role: Role,
    pub content: String,
}

/// Request to the language model service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_message: String,
    pub prior_turns: Vec<PriorTurn>,
    pub system_instruction: String,
}

impl ChatRequest {
    /// Request with no history and a custom instruction
    pub fn standalone(user_message: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            prior_turns: Vec::new(),
            system_instruction: system_instruction.into(),
        }
    }

    /// Chat request carrying the last `window` turns of `history`
    ///
    /// History is sent in the canonical language, oldest first.
    pub fn for_conversation(
        history: &[ConversationTurn],
        window: usize,
        user_message: impl Into<String>,
    ) -> Self {
        let start = history.len().saturating_sub(window);
        let prior_turns = history[start..]
            .iter()
            .map(|turn| PriorTurn {
                role: turn.role,
                content: turn.text.clone(),
            })
            .collect();

        Self {
            user_message: user_message.into(),
            prior_turns,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Replace the outbound user message, e.g. after translation
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = user_message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_window_keeps_most_recent_turns() {
        let now = Utc::now();
        let history: Vec<ConversationTurn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::assistant(format!("a{}", i), now)
                } else {
                    ConversationTurn::user(format!("u{}", i), now)
                }
            })
            .collect();

        let request = ChatRequest::for_conversation(&history, DEFAULT_HISTORY_WINDOW, "hello");
        assert_eq!(request.prior_turns.len(), 6);
        assert_eq!(request.prior_turns[0].content, "a4");
        assert_eq!(request.prior_turns[5].content, "u9");
        assert_eq!(request.prior_turns[5].role, Role::User);
        assert_eq!(request.user_message, "hello");
        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_history_uses_canonical_text() {
        let mut turn = ConversationTurn::assistant("How do you feel?", Utc::now());
        turn.localized = Some("¿Cómo te sientes?".to_string());

        let request = ChatRequest::for_conversation(&[turn], 6, "bien");
        assert_eq!(request.prior_turns[0].content, "How do you feel?");
    }

    #[test]
    fn test_short_history() {
        let request = ChatRequest::for_conversation(&[], 6, "hi");
        assert!(request.prior_turns.is_empty());
    }
}
