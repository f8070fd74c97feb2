//! Notification delivery seam
//!
//! Notifications are fire-and-forget: nothing the core does depends on
//! whether one was shown.

use colored::Colorize;
use std::io::Write;
use tracing::info;

/// Title used for symptom-logging reminders
pub const REMINDER_TITLE: &str = "EpiGuard Reminder";

/// Body used for symptom-logging reminders
pub const REMINDER_BODY: &str = "It's time to log your symptoms. How are you feeling now?";

/// Best-effort notification collaborator
pub trait NotificationService: Send + Sync {
    fn fire(&self, title: &str, body: &str);
}

/// Prints notifications to the terminal with a bell
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl NotificationService for TerminalNotifier {
    fn fire(&self, title: &str, body: &str) {
        info!(title, "notification fired");
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\x07\n{} {}", format!("[{}]", title).bold().yellow(), body);
    }
}

/// Drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl NotificationService for SilentNotifier {
    fn fire(&self, _title: &str, _body: &str) {}
}
