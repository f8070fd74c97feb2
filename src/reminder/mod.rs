//! Reminder module
//!
//! Tracks when the next "time to log symptoms" prompt is due and drives the
//! periodic check that fires it.

pub mod scheduler;
pub mod ticker;

// Re-export commonly used types
pub use scheduler::{format_remaining, ReminderDue, ReminderInterval, ReminderScheduler};
pub use ticker::{ReminderTicker, DEFAULT_CHECK_PERIOD};
