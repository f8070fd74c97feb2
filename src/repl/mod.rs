//! REPL (Read-Eval-Print Loop) module for the interactive tracker
//!
//! Reads lines with rustyline, dispatches `/` commands, and sends
//! everything else to the session controller.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::sync::Arc;

use crate::config::{Config, EmergencyContact, SettingsStore};
use crate::errors::TrackerError;
use crate::repl::commands::Command;
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};
use crate::session::SessionController;
use crate::types::{Language, RiskLevel};

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    display_manager: DisplayManager,
    controller: Arc<SessionController>,
    contacts: Vec<EmergencyContact>,
    settings: Option<SettingsStore>,
}

impl ReplSession {
    pub fn new(
        input_handler: InputHandler,
        display_manager: DisplayManager,
        controller: Arc<SessionController>,
        contacts: Vec<EmergencyContact>,
    ) -> Self {
        ReplSession {
            input_handler,
            display_manager,
            controller,
            contacts,
            settings: None,
        }
    }

    /// Write `/lang`, `/interval` and `/notify` changes back to a config file
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Show welcome banner followed by the opening turn
    pub async fn show_welcome(&self, version: &str, model: &str) {
        let state = self.controller.snapshot().await;
        self.display_manager.show_banner(version, model, state.language());
        if let Some(greeting) = state.history().first() {
            self.display_manager.show_turn(greeting);
            println!();
        }
    }

    /// Main loop; returns on `/exit` or Ctrl-D
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input_handler.read_line()? {
                InputEvent::Line(line) => {
                    if !self.handle_input(&line).await? {
                        break;
                    }
                }
                InputEvent::Interrupted => {
                    println!("\nUse /exit to quit gracefully");
                }
                InputEvent::Eof => break,
            }
        }

        self.input_handler.save_history()?;
        Ok(())
    }

    /// Handle one line; returns false when the session should end
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        match commands::parse(input) {
            Some(command) => self.execute(command).await,
            None => {
                self.send(input).await;
                Ok(true)
            }
        }
    }

    async fn send(&self, text: &str) {
        let spinner = self.display_manager.start_thinking();
        let result = self.controller.send_message(text).await;
        self.display_manager.finish_thinking(spinner);

        match result {
            Ok(outcome) => {
                self.display_manager.show_reply(&outcome.reply, outcome.answered);
                if outcome.risk != RiskLevel::Low {
                    self.display_manager.show_risk(outcome.risk, &self.contacts);
                }
            }
            Err(TrackerError::SendInFlight) => {
                self.display_manager
                    .show_warning("Still waiting for the previous reply.");
            }
            Err(e) => self.display_manager.show_error(&e.to_string()),
        }
    }

    fn persist<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Config),
    {
        if let Some(store) = &mut self.settings {
            if let Err(e) = store.update(change) {
                self.display_manager.show_warning(&format!(
                    "Could not save settings to {}: {}",
                    store.path().display(),
                    e
                ));
            }
        }
    }

    async fn execute(&mut self, command: Command) -> Result<bool> {
        let now = self.controller.clock().now();

        match command {
            Command::Help => self.display_manager.show_help(),
            Command::Exit => {
                println!("Take care!");
                return Ok(false);
            }
            Command::Symptoms => {
                let state = self.controller.snapshot().await;
                self.display_manager.show_symptoms(state.symptoms(), now);
            }
            Command::Risk => {
                let state = self.controller.snapshot().await;
                self.display_manager.show_risk(state.risk(), &self.contacts);
            }
            Command::Reminder => {
                let state = self.controller.snapshot().await;
                self.display_manager.show_reminder(
                    state.reminder(),
                    now,
                    state.notifications_enabled(),
                );
            }
            Command::Language { code: None } => {
                let state = self.controller.snapshot().await;
                self.display_manager.show_languages(state.language());
            }
            Command::Language { code: Some(code) } => match code.parse::<Language>() {
                Ok(language) => {
                    let spinner = self.display_manager.start_thinking();
                    let report = self.controller.change_language(language).await;
                    self.display_manager.finish_thinking(spinner);

                    self.display_manager
                        .show_info(&format!("Language set to {}", language));
                    self.persist(|config| config.language.active = language);
                    if report.kept > 0 {
                        self.display_manager.show_warning(&format!(
                            "{} item(s) could not be translated and were left as they were",
                            report.kept
                        ));
                    }
                }
                Err(e) => self.display_manager.show_error(&e.to_string()),
            },
            Command::Interval { hours } => {
                let parsed = hours.as_deref().and_then(|h| h.parse::<u32>().ok());
                match parsed {
                    Some(hours) => match self.controller.set_reminder_interval(hours).await {
                        Ok(interval) => {
                            self.display_manager
                                .show_info(&format!("Reminders set to {}", interval));
                            self.persist(|config| config.reminders.interval_hours = interval);
                        }
                        Err(e) => self.display_manager.show_error(&e.to_string()),
                    },
                    None => self
                        .display_manager
                        .show_error("Usage: /interval <4|8|12|24>"),
                }
            }
            Command::Notify { enable } => {
                let enabled = match enable {
                    Some(enabled) => enabled,
                    None => !self.controller.snapshot().await.notifications_enabled(),
                };
                self.controller.set_notifications(enabled).await;
                let state = if enabled { "on" } else { "off" };
                self.display_manager
                    .show_info(&format!("Notifications {}", state));
                self.persist(|config| config.reminders.notifications = enabled);
            }
            Command::Contacts => {
                self.display_manager.show_contacts(&self.contacts);
                println!();
            }
            Command::Stats => {
                let telemetry = self.controller.telemetry();
                self.display_manager
                    .show_stats(&telemetry.get_stats(), telemetry.structured_reply_rate());
            }
            Command::History { limit } => {
                let state = self.controller.snapshot().await;
                self.display_manager
                    .show_history(state.history(), limit.unwrap_or(10));
            }
            Command::Unknown { input } => {
                self.display_manager
                    .show_error(&format!("Unknown command: {}", input));
                println!("Type /help for available commands");
            }
        }

        Ok(true)
    }
}
