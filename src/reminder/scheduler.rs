//! Reminder due-time tracking
//!
//! ```text
//! check(now):
//!   if next_due_at unset:   next_due_at ← now + interval        (no event)
//!   elif now ≥ next_due_at: next_due_at ← now + interval        (one event)
//! ```
//!
//! The next due time is computed from the firing moment, so missed cycles
//! are never replayed: a check ten hours late on a four-hour interval fires
//! once and schedules four hours from the late check.

use crate::errors::{Result, TrackerError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported reminder intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReminderInterval {
    Every4Hours,
    Every8Hours,
    #[default]
    Every12Hours,
    Every24Hours,
}

impl ReminderInterval {
    pub fn hours(&self) -> u32 {
        match self {
            ReminderInterval::Every4Hours => 4,
            ReminderInterval::Every8Hours => 8,
            ReminderInterval::Every12Hours => 12,
            ReminderInterval::Every24Hours => 24,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(i64::from(self.hours()))
    }
}

impl TryFrom<u32> for ReminderInterval {
    type Error = TrackerError;

    fn try_from(hours: u32) -> Result<Self> {
        match hours {
            4 => Ok(ReminderInterval::Every4Hours),
            8 => Ok(ReminderInterval::Every8Hours),
            12 => Ok(ReminderInterval::Every12Hours),
            24 => Ok(ReminderInterval::Every24Hours),
            other => Err(TrackerError::InvalidReminderInterval(other)),
        }
    }
}

impl From<ReminderInterval> for u32 {
    fn from(interval: ReminderInterval) -> Self {
        interval.hours()
    }
}

impl fmt::Display for ReminderInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} hours", self.hours())
    }
}

/// A fired reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDue {
    pub fired_at: DateTime<Utc>,
    pub next_due_at: DateTime<Utc>,
}

/// Reminder state: the next due time and the interval between reminders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderScheduler {
    next_due_at: Option<DateTime<Utc>>,
    interval: ReminderInterval,
}

impl ReminderScheduler {
    /// Scheduler with no due time yet
    pub fn new(interval: ReminderInterval) -> Self {
        Self {
            next_due_at: None,
            interval,
        }
    }

    /// Scheduler resuming from a known due time
    pub fn with_due_time(interval: ReminderInterval, next_due_at: DateTime<Utc>) -> Self {
        Self {
            next_due_at: Some(next_due_at),
            interval,
        }
    }

    /// Set the first due time if none is set; returns the due time
    pub fn initialize(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let interval = self.interval.duration();
        *self.next_due_at.get_or_insert(now + interval)
    }

    /// Evaluate the schedule at `now`, firing at most once
    pub fn check(&mut self, now: DateTime<Utc>) -> Option<ReminderDue> {
        let due = match self.next_due_at {
            Some(due) => due,
            None => {
                self.initialize(now);
                return None;
            }
        };

        if now < due {
            return None;
        }

        let next_due_at = now + self.interval.duration();
        self.next_due_at = Some(next_due_at);
        Some(ReminderDue {
            fired_at: now,
            next_due_at,
        })
    }

    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.next_due_at
    }

    pub fn interval(&self) -> ReminderInterval {
        self.interval
    }

    /// Change the interval; the pending due time is left as it is
    pub fn set_interval(&mut self, interval: ReminderInterval) {
        self.interval = interval;
    }

    /// Time until the next reminder, zero once overdue
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_due_at
            .map(|due| due.signed_duration_since(now).max(Duration::zero()))
    }

    /// Elapsed share of the current interval, clamped to 0..=100
    pub fn progress_percent(&self, now: DateTime<Utc>) -> f64 {
        let Some(due) = self.next_due_at else {
            return 0.0;
        };
        let total = self.interval.duration().num_milliseconds() as f64;
        let remaining = due.signed_duration_since(now).num_milliseconds() as f64;
        ((total - remaining) / total * 100.0).clamp(0.0, 100.0)
    }
}

/// Render a countdown as `"{h}h {m}m"`
pub fn format_remaining(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_interval_set() {
        assert_eq!(ReminderInterval::try_from(8).unwrap(), ReminderInterval::Every8Hours);
        assert!(matches!(
            ReminderInterval::try_from(6),
            Err(TrackerError::InvalidReminderInterval(6))
        ));
        assert_eq!(ReminderInterval::default().hours(), 12);
    }

    #[test]
    fn test_first_check_initializes_without_firing() {
        let mut scheduler = ReminderScheduler::new(ReminderInterval::Every4Hours);
        assert_eq!(scheduler.check(t0()), None);
        assert_eq!(scheduler.next_due_at(), Some(t0() + Duration::hours(4)));
    }

    #[test]
    fn test_initialize_keeps_existing_due_time() {
        let due = t0() + Duration::hours(1);
        let mut scheduler = ReminderScheduler::with_due_time(ReminderInterval::Every4Hours, due);
        assert_eq!(scheduler.initialize(t0()), due);
    }

    #[test]
    fn test_fires_at_due_time() {
        let mut scheduler =
            ReminderScheduler::with_due_time(ReminderInterval::Every4Hours, t0());
        assert_eq!(scheduler.check(t0() - Duration::seconds(1)), None);

        let fired = scheduler.check(t0()).unwrap();
        assert_eq!(fired.fired_at, t0());
        assert_eq!(fired.next_due_at, t0() + Duration::hours(4));
    }

    #[test]
    fn test_late_check_fires_once_without_catch_up() {
        let mut scheduler =
            ReminderScheduler::with_due_time(ReminderInterval::Every4Hours, t0());

        let late = t0() + Duration::hours(10);
        let fired = scheduler.check(late).unwrap();
        assert_eq!(fired.next_due_at, t0() + Duration::hours(14));

        // No queued T+4h/T+8h/T+12h events on the following checks.
        assert_eq!(scheduler.check(late + Duration::minutes(1)), None);
        assert_eq!(scheduler.check(late + Duration::hours(3)), None);
    }

    #[test]
    fn test_set_interval_keeps_due_time() {
        let mut scheduler =
            ReminderScheduler::with_due_time(ReminderInterval::Every12Hours, t0());
        scheduler.set_interval(ReminderInterval::Every24Hours);
        assert_eq!(scheduler.next_due_at(), Some(t0()));

        let fired = scheduler.check(t0()).unwrap();
        assert_eq!(fired.next_due_at, t0() + Duration::hours(24));
    }

    #[test]
    fn test_countdown_and_progress() {
        let due = t0() + Duration::hours(4);
        let scheduler = ReminderScheduler::with_due_time(ReminderInterval::Every4Hours, due);

        let now = t0() + Duration::hours(1);
        let remaining = scheduler.time_remaining(now).unwrap();
        assert_eq!(format_remaining(remaining), "3h 0m");
        assert!((scheduler.progress_percent(now) - 25.0).abs() < 1e-9);

        let overdue = due + Duration::hours(1);
        assert_eq!(scheduler.time_remaining(overdue), Some(Duration::zero()));
        assert_eq!(scheduler.progress_percent(overdue), 100.0);
        assert_eq!(
            ReminderScheduler::new(ReminderInterval::Every4Hours).progress_percent(now),
            0.0
        );
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::minutes(135)), "2h 15m");
        assert_eq!(format_remaining(Duration::seconds(30)), "0h 0m");
    }
}
