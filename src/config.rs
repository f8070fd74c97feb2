//! Configuration management for EpiGuard
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.epiguard/config.toml

use crate::errors::{Result, TrackerError};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_HISTORY_WINDOW, DEFAULT_MODEL};
use crate::reminder::ReminderInterval;
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for EpiGuard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default = "default_contacts")]
    pub contacts: Vec<EmergencyContact>,
}

/// Language model connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Prior turns sent with each chat request
    pub history_window: usize,
}

/// Symptom-logging reminder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub interval_hours: ReminderInterval,
    pub notifications: bool,
    pub check_period_secs: u64,
}

/// Display language configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub active: Language,
}

/// Kind of emergency contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactKind {
    Medical,
    #[default]
    Personal,
    Emergency,
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactKind::Medical => "Medical",
            ContactKind::Personal => "Personal",
            ContactKind::Emergency => "Emergency",
        };
        f.write_str(label)
    }
}

/// Someone to call when risk is high
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
    #[serde(default)]
    pub kind: ContactKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            reminders: ReminderConfig::default(),
            language: LanguageConfig::default(),
            contacts: default_contacts(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_hours: ReminderInterval::default(),
            notifications: true,
            check_period_secs: 60,
        }
    }
}

fn default_contacts() -> Vec<EmergencyContact> {
    vec![EmergencyContact {
        name: "Dr. Smith".to_string(),
        number: "555-0123".to_string(),
        kind: ContactKind::Medical,
    }]
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TrackerError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or built-in defaults if absent
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".epiguard").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.llm.base_url.starts_with("http://") || self.llm.base_url.starts_with("https://")) {
            return Err(TrackerError::ConfigError(format!(
                "llm.base_url must be an http(s) URL, got {:?}",
                self.llm.base_url
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(TrackerError::ConfigError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if self.llm.history_window == 0 || self.llm.history_window > 50 {
            return Err(TrackerError::ConfigError(
                "llm.history_window must be between 1 and 50".to_string(),
            ));
        }

        if self.reminders.check_period_secs == 0 {
            return Err(TrackerError::ConfigError(
                "reminders.check_period_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TrackerError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TrackerError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TrackerError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Period between reminder checks
    pub fn check_period(&self) -> Duration {
        Duration::from_secs(self.reminders.check_period_secs)
    }

    pub fn add_contact(&mut self, contact: EmergencyContact) {
        self.contacts.push(contact);
    }

    /// Remove the contact at `index` (zero-based)
    pub fn remove_contact(&mut self, index: usize) -> Result<EmergencyContact> {
        if index >= self.contacts.len() {
            return Err(TrackerError::ConfigError(format!(
                "No contact #{} (have {})",
                index + 1,
                self.contacts.len()
            )));
        }
        Ok(self.contacts.remove(index))
    }
}

/// Config file that in-session setting changes are written back to
///
/// Holds the file contents as loaded, so command-line overrides never
/// reach the file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    config: Config,
}

impl SettingsStore {
    pub fn new(path: PathBuf, config: Config) -> Self {
        Self { path, config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply `change` and save the file
    pub fn update<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Config),
    {
        change(&mut self.config);
        self.config.save(&self.path)
    }
}
