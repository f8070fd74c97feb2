//! Telemetry system for EpiGuard
//!
//! Counts session events so degradations (fallback parses, service errors,
//! failed translations) stay visible even though they never reach the user.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Maximum number of events kept for inspection
pub const MAX_RECENT_EVENTS: usize = 256;

/// Telemetry event types
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    /// A reply came back from the language model service
    ReplyReceived { duration_ms: u64 },
    /// Model output could not be decoded and the fallback was used
    ParseFallback,
    /// The language model service failed
    ServiceFailure { error: String },
    /// A translation failed and the original text was kept
    TranslationFailure { error: String },
    /// A send was attempted while a reply was pending
    SendRejected,
    /// A reconciliation pass was applied
    Reconciled { symptoms: usize, evicted: usize },
    /// A reminder due event fired
    ReminderFired,
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryStats {
    pub replies: usize,
    pub parse_fallbacks: usize,
    pub service_failures: usize,
    pub translation_failures: usize,
    pub rejected_sends: usize,
    pub reconciliations: usize,
    pub evictions: usize,
    pub reminders_fired: usize,
}

/// Telemetry collector, cheap to clone and shared across components
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RECENT_EVENTS))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        if let Ok(mut stats) = self.stats.lock() {
            match &event {
                TelemetryEvent::ReplyReceived { .. } => stats.replies += 1,
                TelemetryEvent::ParseFallback => stats.parse_fallbacks += 1,
                TelemetryEvent::ServiceFailure { .. } => stats.service_failures += 1,
                TelemetryEvent::TranslationFailure { .. } => stats.translation_failures += 1,
                TelemetryEvent::SendRejected => stats.rejected_sends += 1,
                TelemetryEvent::Reconciled { evicted, .. } => {
                    stats.reconciliations += 1;
                    stats.evictions += evicted;
                }
                TelemetryEvent::ReminderFired => stats.reminders_fired += 1,
            }
        }

        if let Ok(mut events) = self.events.lock() {
            if events.len() >= MAX_RECENT_EVENTS {
                events.pop_front();
            }
            events.push_back(event);
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Time since the collector was created
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Number of events currently retained
    pub fn event_count(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    /// Most recent `n` events, oldest first
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| {
                let start = events.len().saturating_sub(n);
                events.range(start..).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Share of replies that decoded as structured updates
    pub fn structured_reply_rate(&self) -> f64 {
        let stats = self.get_stats();
        if stats.replies == 0 {
            return 1.0;
        }
        let structured = stats.replies.saturating_sub(stats.parse_fallbacks);
        structured as f64 / stats.replies as f64
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}
