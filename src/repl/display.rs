//! Display manager for REPL terminal UI
//!
//! Renders conversation turns, the symptom timeline, risk and reminder
//! status with colored output, plus a spinner while a reply is pending.

use crate::config::EmergencyContact;
use crate::reminder::{format_remaining, ReminderScheduler};
use crate::repl::commands::HELP;
use crate::telemetry::TelemetryStats;
use crate::timeline::RiskAdopter;
use crate::types::{ConversationTurn, Language, RiskLevel, Role, Severity, SymptomSet};
use chrono::{DateTime, Duration, Utc};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration as StdDuration;

/// Display manager for REPL UI
pub struct DisplayManager {
    show_progress: bool,
    tick_interval: StdDuration,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager {
            show_progress,
            tick_interval: StdDuration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, language: Language) {
        let width = 64;
        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", format!("  EpiGuard {} - Symptom Tracker", version).bold().cyan());
        println!("{}", format!("  Model: {} | Language: {}", model, language).dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Tell me how you feel (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Spinner shown while waiting for the assistant
    pub fn start_thinking(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message("Thinking...");
        pb.enable_steady_tick(self.tick_interval);
        Some(pb)
    }

    pub fn finish_thinking(&self, pb: Option<ProgressBar>) {
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }

    pub fn show_turn(&self, turn: &ConversationTurn) {
        match turn.role {
            Role::Assistant => println!("{} {}", "epiguard>".bold().cyan(), turn.display_text()),
            Role::User => println!("{} {}", "you>".bold(), turn.display_text()),
        }
    }

    /// Print the assistant's reply, with a note when the service failed
    pub fn show_reply(&self, reply: &str, answered: bool) {
        let prefix = "epiguard>".bold().cyan();
        if answered {
            println!("{} {}\n", prefix, reply);
        } else {
            println!("{} {}\n", prefix, reply.yellow());
        }
    }

    pub fn show_symptoms(&self, symptoms: &SymptomSet, now: DateTime<Utc>) {
        self.show_section("Tracked symptoms");
        if symptoms.is_empty() {
            println!("  {}", "No symptoms recorded in the last 24 hours.".dimmed());
            println!();
            return;
        }

        for symptom in symptoms.iter() {
            println!(
                "  {} {} {}",
                symptom.display_name().bold(),
                severity_badge(&symptom.severity),
                format!("({})", format_age(now - symptom.timestamp)).dimmed()
            );
            println!("    {}", symptom.display_advice());
        }
        println!();
    }

    pub fn show_risk(&self, risk: RiskLevel, contacts: &[EmergencyContact]) {
        println!("{} {}", "Risk level:".bold(), risk_badge(risk));
        if let Some(guidance) = RiskAdopter::guidance(risk) {
            println!("  {}", guidance);
        }
        if risk == RiskLevel::High {
            self.show_contacts(contacts);
        }
        println!();
    }

    pub fn show_contacts(&self, contacts: &[EmergencyContact]) {
        self.show_section("Emergency contacts");
        if contacts.is_empty() {
            println!("  {}", "No contacts configured.".dimmed());
        }
        for (index, contact) in contacts.iter().enumerate() {
            println!(
                "  {}. {} {} {}",
                index + 1,
                contact.name.bold(),
                contact.number,
                format!("[{}]", contact.kind).dimmed()
            );
        }
    }

    pub fn show_reminder(&self, reminder: &ReminderScheduler, now: DateTime<Utc>, notifications: bool) {
        println!("{} {}", "Reminder:".bold(), reminder.interval());
        if let Some(remaining) = reminder.time_remaining(now) {
            println!(
                "  Next check-in in {} ({:.0}% of interval elapsed)",
                format_remaining(remaining).cyan(),
                reminder.progress_percent(now)
            );
        }
        let state = if notifications { "on".green() } else { "off".red() };
        println!("  Notifications: {}\n", state);
    }

    pub fn show_languages(&self, active: Language) {
        self.show_section("Languages");
        for language in Language::ALL {
            let marker = if language == active { "*" } else { " " };
            println!("  {} {}", marker.green(), language);
        }
        println!();
    }

    pub fn show_history(&self, history: &[ConversationTurn], limit: usize) {
        let start = history.len().saturating_sub(limit);
        for turn in &history[start..] {
            self.show_turn(turn);
        }
        println!();
    }

    pub fn show_stats(&self, stats: &TelemetryStats, structured_rate: f64) {
        self.show_section("Session statistics");
        println!("  Replies:              {}", stats.replies);
        println!("  Structured replies:   {:.0}%", structured_rate * 100.0);
        println!("  Service failures:     {}", stats.service_failures);
        println!("  Translation failures: {}", stats.translation_failures);
        println!("  Rejected sends:       {}", stats.rejected_sends);
        println!("  Expired symptoms:     {}", stats.evictions);
        println!("  Reminders fired:      {}\n", stats.reminders_fired);
    }

    pub fn show_help(&self) {
        self.show_section("Available Commands");
        for (usage, description) in HELP {
            println!("  {:<24} {}", usage.green(), description);
        }
        println!();
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "✗".red(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "⚠".yellow(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "ℹ".blue(), info);
    }

    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(title.chars().count()).cyan());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(true)
    }
}

fn severity_badge(severity: &Severity) -> ColoredString {
    let label = format!("[{}]", severity.label());
    match severity {
        Severity::Severe => label.red().bold(),
        Severity::Moderate => label.yellow(),
        Severity::Mild => label.green(),
        Severity::Unrecognized(_) => label.dimmed(),
    }
}

fn risk_badge(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::High => risk.label().red().bold(),
        RiskLevel::Moderate => risk.label().yellow().bold(),
        RiskLevel::Low => risk.label().green(),
    }
}

/// Render the age of an entry, e.g. `"just now"`, `"25m ago"`, `"3h 10m ago"`
pub fn format_age(age: Duration) -> String {
    let minutes = age.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else {
        format!("{} ago", format_remaining(age))
    }
}
