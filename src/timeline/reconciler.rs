//! Symptom timeline reconciliation
//!
//! One pass merges a structured update into the current symptom set in a
//! fixed order:
//!
//! ```text
//! 1. remove   - drop entries named in symptomActions.remove
//! 2. update   - revise matching entries from symptomActions.update (never inserts)
//! 3. stage    - build fresh entries from `symptoms`
//! 4. evict    - drop pre-existing survivors older than the window
//! 5. resolve  - drop survivors whose key is also staged (new wins)
//! 6. result   = survivors ∪ staged
//! ```
//!
//! The pass works on a copy; the caller swaps it in whole, so a symptom set
//! is never observed half-reconciled.

use crate::types::{canonical_name, StructuredUpdate, Symptom, SymptomSet};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Age after which a pre-existing entry is evicted
pub const EVICTION_WINDOW_HOURS: i64 = 24;

/// Counters describing what one pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub removed: usize,
    pub updated: usize,
    pub dropped_updates: usize,
    pub staged: usize,
    pub evicted: usize,
    pub superseded: usize,
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub symptoms: SymptomSet,
    pub stats: ReconcileStats,
}

#[derive(Debug, Clone)]
pub struct TimelineReconciler {
    window: Duration,
}

impl Default for TimelineReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineReconciler {
    pub fn new() -> Self {
        Self::with_window(Duration::hours(EVICTION_WINDOW_HOURS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self { window }
    }

    /// Run one reconciliation pass
    pub fn reconcile(
        &self,
        current: &SymptomSet,
        update: &StructuredUpdate,
        now: DateTime<Utc>,
    ) -> Reconciliation {
        let mut stats = ReconcileStats::default();
        let mut pool = current.clone();
        let actions = &update.symptom_actions;

        for name in &actions.remove {
            if pool.remove(name).is_some() {
                stats.removed += 1;
            }
        }

        for revision in &actions.update {
            match pool.get_mut(&revision.name) {
                Some(entry) => {
                    let severity = revision
                        .severity
                        .clone()
                        .unwrap_or_else(|| entry.severity.clone());
                    entry.revise(severity, now);
                    stats.updated += 1;
                }
                None => {
                    debug!(symptom = %revision.name, "update targets unknown symptom; dropped");
                    stats.dropped_updates += 1;
                }
            }
        }

        let staged: SymptomSet = update
            .symptoms
            .iter()
            .filter(|observation| !canonical_name(&observation.name).is_empty())
            .map(|observation| {
                Symptom::observed(
                    &observation.name,
                    observation.severity.clone().unwrap_or_default(),
                    now,
                )
            })
            .collect();
        stats.staged = staged.len();

        let window = self.window;
        let before_eviction = pool.len();
        pool.retain(|entry| now.signed_duration_since(entry.timestamp) <= window);
        stats.evicted = before_eviction - pool.len();

        let before_resolution = pool.len();
        pool.retain(|entry| !staged.contains(&entry.name));
        stats.superseded = before_resolution - pool.len();

        for entry in staged.iter() {
            pool.insert(entry.clone());
        }

        if stats.evicted > 0 {
            debug!(evicted = stats.evicted, "evicted stale symptoms");
        }

        Reconciliation {
            symptoms: pool,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::AdviceResolver;
    use crate::types::{Severity, SymptomActions, SymptomObservation};

    fn set_with(entries: &[(&str, Severity, DateTime<Utc>)]) -> SymptomSet {
        entries
            .iter()
            .map(|(name, severity, at)| Symptom::observed(name, severity.clone(), *at))
            .collect()
    }

    #[test]
    fn test_empty_update_leaves_set_unchanged() {
        let now = Utc::now();
        let current = set_with(&[
            ("headache", Severity::Moderate, now - Duration::hours(2)),
            ("fatigue", Severity::Mild, now - Duration::hours(5)),
        ]);

        let result = TimelineReconciler::new().reconcile(
            &current,
            &StructuredUpdate::reply_only("noted"),
            now,
        );

        assert_eq!(result.symptoms, current);
        assert_eq!(result.stats, ReconcileStats::default());
    }

    #[test]
    fn test_removal_is_case_insensitive() {
        let now = Utc::now();
        let current = set_with(&[("headache", Severity::Mild, now)]);
        let mut update = StructuredUpdate::reply_only("glad it's gone");
        update.symptom_actions.remove = vec!["Headache".to_string()];

        let result = TimelineReconciler::new().reconcile(&current, &update, now);
        assert!(result.symptoms.is_empty());
        assert_eq!(result.stats.removed, 1);
    }

    #[test]
    fn test_eviction_boundary() {
        let now = Utc::now();
        let current = set_with(&[
            ("old", Severity::Mild, now - Duration::hours(25)),
            ("recent", Severity::Mild, now - Duration::hours(23)),
        ]);

        let result = TimelineReconciler::new().reconcile(
            &current,
            &StructuredUpdate::fallback("not json"),
            now,
        );

        assert!(!result.symptoms.contains("old"));
        assert!(result.symptoms.contains("recent"));
        assert_eq!(result.stats.evicted, 1);
    }

    #[test]
    fn test_exactly_window_old_survives() {
        let now = Utc::now();
        let current = set_with(&[("edge", Severity::Mild, now - Duration::hours(24))]);
        let result = TimelineReconciler::new().reconcile(
            &current,
            &StructuredUpdate::reply_only("ok"),
            now,
        );
        assert!(result.symptoms.contains("edge"));
    }

    #[test]
    fn test_new_entry_wins_over_existing() {
        let t0 = Utc::now() - Duration::hours(3);
        let now = Utc::now();
        let current = set_with(&[("dizziness", Severity::Mild, t0)]);
        let mut update = StructuredUpdate::reply_only("that sounds worse");
        update.symptoms = vec![SymptomObservation::new("Dizziness", "High")];

        let result = TimelineReconciler::new().reconcile(&current, &update, now);

        assert_eq!(result.symptoms.len(), 1);
        let entry = result.symptoms.get("dizziness").unwrap();
        assert_eq!(entry.severity, Severity::Severe);
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.advice(), AdviceResolver::resolve(&Severity::Severe));
        assert_eq!(result.stats.superseded, 1);
    }

    #[test]
    fn test_update_of_absent_name_inserts_nothing() {
        let now = Utc::now();
        let mut update = StructuredUpdate::reply_only("ok");
        update.symptom_actions.update = vec![SymptomObservation::new("nausea", "Moderate")];

        let result = TimelineReconciler::new().reconcile(&SymptomSet::new(), &update, now);
        assert!(result.symptoms.is_empty());
        assert_eq!(result.stats.dropped_updates, 1);
    }

    #[test]
    fn test_update_revises_and_refreshes() {
        let t0 = Utc::now() - Duration::hours(30);
        let now = Utc::now();
        let current = set_with(&[("aura", Severity::Mild, t0)]);
        let mut update = StructuredUpdate::reply_only("ok");
        update.symptom_actions = SymptomActions {
            update: vec![SymptomObservation::new("AURA", "Moderate")],
            ..SymptomActions::default()
        };

        let result = TimelineReconciler::new().reconcile(&current, &update, now);

        // Refreshed before eviction, so the 30h-old entry survives.
        let entry = result.symptoms.get("aura").unwrap();
        assert_eq!(entry.severity, Severity::Moderate);
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.advice(), AdviceResolver::resolve(&Severity::Moderate));
    }

    #[test]
    fn test_update_without_severity_keeps_existing_severity() {
        let t0 = Utc::now() - Duration::hours(1);
        let now = Utc::now();
        let current = set_with(&[("anxiety", Severity::Moderate, t0)]);
        let mut update = StructuredUpdate::reply_only("ok");
        update.symptom_actions.update = vec![SymptomObservation {
            name: "anxiety".to_string(),
            severity: None,
        }];

        let result = TimelineReconciler::new().reconcile(&current, &update, now);
        let entry = result.symptoms.get("anxiety").unwrap();
        assert_eq!(entry.severity, Severity::Moderate);
        assert_eq!(entry.timestamp, now);
    }

    #[test]
    fn test_staged_entries_ignore_removal_in_same_pass() {
        let now = Utc::now();
        let current = set_with(&[("cough", Severity::Mild, now - Duration::hours(1))]);
        let mut update = StructuredUpdate::reply_only("ok");
        update.symptom_actions.remove = vec!["cough".to_string()];
        update.symptoms = vec![SymptomObservation::new("cough", "Moderate")];

        let result = TimelineReconciler::new().reconcile(&current, &update, now);
        assert_eq!(result.symptoms.get("cough").unwrap().severity, Severity::Moderate);
    }

    #[test]
    fn test_blank_names_are_not_staged() {
        let now = Utc::now();
        let mut update = StructuredUpdate::reply_only("ok");
        update.symptoms = vec![SymptomObservation::new("   ", "Mild")];

        let result = TimelineReconciler::new().reconcile(&SymptomSet::new(), &update, now);
        assert!(result.symptoms.is_empty());
    }
}
