//! Property tests for symptom timeline reconciliation

use chrono::{DateTime, Duration, TimeZone, Utc};
use epiguard::timeline::{AdviceResolver, TimelineReconciler};
use epiguard::types::{
    canonical_name, Severity, StructuredUpdate, Symptom, SymptomObservation, SymptomSet,
};
use quickcheck_macros::quickcheck;
use std::collections::BTreeSet;

const NAMES: &[&str] = &["headache", "Fever", "cough", " Nausea ", "FATIGUE", "fever", "nausea"];
const SEVERITIES: &[&str] = &["Severe", "moderate", "Mild", "High", "low", "sort of bad"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn name(index: u8) -> &'static str {
    NAMES[index as usize % NAMES.len()]
}

fn severity(index: u8) -> Severity {
    Severity::parse(SEVERITIES[index as usize % SEVERITIES.len()])
}

/// Existing entries aged 0..48 hours
fn existing(entries: &[(u8, u8, u8)]) -> SymptomSet {
    entries
        .iter()
        .map(|&(n, s, age)| {
            let at = now() - Duration::hours(i64::from(age % 48));
            Symptom::observed(name(n), severity(s), at)
        })
        .collect()
}

fn update(incoming: &[(u8, u8)], removals: &[u8], revisions: &[(u8, u8)]) -> StructuredUpdate {
    let mut update = StructuredUpdate::reply_only("ok");
    update.symptoms = incoming
        .iter()
        .map(|&(n, s)| SymptomObservation::new(name(n), severity(s)))
        .collect();
    update.symptom_actions.remove = removals.iter().map(|&n| name(n).to_string()).collect();
    update.symptom_actions.update = revisions
        .iter()
        .map(|&(n, s)| SymptomObservation::new(name(n), severity(s)))
        .collect();
    update
}

fn reconcile(
    current: &[(u8, u8, u8)],
    incoming: &[(u8, u8)],
    removals: &[u8],
    revisions: &[(u8, u8)],
) -> SymptomSet {
    TimelineReconciler::new()
        .reconcile(&existing(current), &update(incoming, removals, revisions), now())
        .symptoms
}

#[quickcheck]
fn prop_keys_are_survivors_plus_staged(
    current: Vec<(u8, u8, u8)>,
    incoming: Vec<(u8, u8)>,
    removals: Vec<u8>,
) -> bool {
    let result = reconcile(&current, &incoming, &removals, &[]);

    let removed: BTreeSet<String> = removals.iter().map(|&n| canonical_name(name(n))).collect();
    let mut expected: BTreeSet<String> = existing(&current)
        .iter()
        .filter(|entry| now() - entry.timestamp <= Duration::hours(24))
        .map(|entry| entry.key())
        .filter(|key| !removed.contains(key))
        .collect();
    expected.extend(incoming.iter().map(|&(n, _)| canonical_name(name(n))));

    let keys: Vec<String> = result.iter().map(|entry| canonical_name(&entry.name)).collect();
    let unique: BTreeSet<String> = keys.iter().cloned().collect();
    keys.len() == unique.len() && keys.len() == result.len() && unique == expected
}

#[quickcheck]
fn prop_advice_matches_severity(
    current: Vec<(u8, u8, u8)>,
    incoming: Vec<(u8, u8)>,
    revisions: Vec<(u8, u8)>,
) -> bool {
    let result = reconcile(&current, &incoming, &[], &revisions);
    let consistent = result
        .iter()
        .all(|entry| entry.advice() == AdviceResolver::resolve(&entry.severity));
    consistent
}

#[quickcheck]
fn prop_nothing_older_than_a_day_survives(
    current: Vec<(u8, u8, u8)>,
    incoming: Vec<(u8, u8)>,
    revisions: Vec<(u8, u8)>,
) -> bool {
    let result = reconcile(&current, &incoming, &[], &revisions);
    let fresh = result
        .iter()
        .all(|entry| now() - entry.timestamp <= Duration::hours(24));
    fresh
}

#[quickcheck]
fn prop_incoming_observations_win(
    current: Vec<(u8, u8, u8)>,
    incoming: Vec<(u8, u8)>,
    removals: Vec<u8>,
) -> bool {
    let result = reconcile(&current, &incoming, &removals, &[]);
    let mut last_seen = std::collections::HashMap::new();
    for &(n, s) in &incoming {
        last_seen.insert(canonical_name(name(n)), severity(s));
    }

    let won = last_seen.iter().all(|(key, expected)| {
        result
            .get(key)
            .map(|entry| &entry.severity == expected && entry.timestamp == now())
            .unwrap_or(false)
    });
    won
}

#[quickcheck]
fn prop_removed_names_gone_unless_reobserved(
    current: Vec<(u8, u8, u8)>,
    incoming: Vec<(u8, u8)>,
    removals: Vec<u8>,
) -> bool {
    let result = reconcile(&current, &incoming, &removals, &[]);
    let gone = removals.iter().all(|&n| {
        let key = canonical_name(name(n));
        let reobserved = incoming
            .iter()
            .any(|&(i, _)| canonical_name(name(i)) == key);
        reobserved || !result.contains(&key)
    });
    gone
}

#[quickcheck]
fn prop_reply_only_update_changes_nothing_recent(current: Vec<(u8, u8, u8)>) -> bool {
    let before = existing(&current);
    let after = reconcile(&current, &[], &[], &[]);
    let unchanged = before
        .iter()
        .filter(|entry| now() - entry.timestamp <= Duration::hours(24))
        .all(|entry| after.get(&entry.name) == Some(entry));
    unchanged
}
