//! Error types for EpiGuard
//!
//! Most failures in a session are absorbed into fallback behavior at the
//! orchestration boundary; these variants describe what is left over.

use thiserror::Error;

/// Main error type for the symptom tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A chat request is already outstanding
    #[error("A reply is still pending; wait for it before sending another message")]
    SendInFlight,

    /// Nothing to send after trimming
    #[error("Message is empty")]
    EmptyMessage,

    /// Language model service errors
    #[error("Language model error: {0}")]
    LanguageModel(String),

    /// Model output that does not decode as a structured update
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Translation service errors
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Reminder interval outside the supported set
    #[error("Unsupported reminder interval: {0}h (expected 4, 8, 12 or 24)")]
    InvalidReminderInterval(u32),

    /// Language code outside the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("EpiGuard error: {0}")]
    Generic(String),
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Convert anyhow errors to TrackerError
impl From<anyhow::Error> for TrackerError {
    fn from(err: anyhow::Error) -> Self {
        TrackerError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::InvalidReminderInterval(5);
        assert!(err.to_string().contains("5h"));
        assert!(err.to_string().contains("24"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: TrackerError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, TrackerError::Generic(_)));
        assert!(err.to_string().contains("disk on fire"));
    }
}
