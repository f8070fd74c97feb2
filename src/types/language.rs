//! Supported display languages

use crate::errors::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
}

impl Language {
    /// Working language of the conversational service
    pub const CANONICAL: Language = Language::English;

    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::French];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
        }
    }

    /// English name, used when asking the model to translate
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }

    /// Name in the language itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::French => "Français",
        }
    }

    pub fn is_canonical(&self) -> bool {
        *self == Self::CANONICAL
    }
}

impl FromStr for Language {
    type Err = TrackerError;

    fn from_str(code: &str) -> Result<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "es" | "spanish" | "español" => Ok(Language::Spanish),
            "fr" | "french" | "français" => Ok(Language::French),
            other => Err(TrackerError::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.native_name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!(" FR ".parse::<Language>().unwrap(), Language::French);
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert!(matches!(
            "de".parse::<Language>(),
            Err(TrackerError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_canonical_is_english() {
        assert!(Language::English.is_canonical());
        assert!(!Language::Spanish.is_canonical());
        assert_eq!(Language::default(), Language::CANONICAL);
    }
}
