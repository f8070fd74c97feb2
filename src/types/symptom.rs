//! Symptom entries and the keyed symptom set

use crate::timeline::AdviceResolver;
use crate::types::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical key for a symptom name: trimmed and lower-cased
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Display strings for a symptom in the active (non-canonical) language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedLabel {
    pub name: String,
    pub advice: String,
}

/// A tracked symptom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Name as reported, in the canonical working language
    pub name: String,
    pub severity: Severity,
    /// Capture time of the most recent write
    pub timestamp: DateTime<Utc>,
    /// Always `AdviceResolver::resolve(&severity)`
    advice: String,
    /// Localized display strings, cleared whenever the entry is rewritten
    pub localized: Option<LocalizedLabel>,
}

impl Symptom {
    /// Build a freshly observed entry with derived advice
    pub fn observed(name: &str, severity: Severity, at: DateTime<Utc>) -> Self {
        let advice = AdviceResolver::resolve(&severity).to_string();
        Self {
            name: name.trim().to_string(),
            severity,
            timestamp: at,
            advice,
            localized: None,
        }
    }

    /// Canonical key of this entry
    pub fn key(&self) -> String {
        canonical_name(&self.name)
    }

    pub fn advice(&self) -> &str {
        &self.advice
    }

    /// Overwrite severity, refresh timestamp and re-derive advice
    pub fn revise(&mut self, severity: Severity, at: DateTime<Utc>) {
        self.advice = AdviceResolver::resolve(&severity).to_string();
        self.severity = severity;
        self.timestamp = at;
        self.localized = None;
    }

    pub fn display_name(&self) -> &str {
        self.localized
            .as_ref()
            .map(|label| label.name.as_str())
            .unwrap_or(&self.name)
    }

    pub fn display_advice(&self) -> &str {
        self.localized
            .as_ref()
            .map(|label| label.advice.as_str())
            .unwrap_or(&self.advice)
    }
}

/// Symptoms keyed by canonical name; never holds two entries for one key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSet {
    entries: BTreeMap<String, Symptom>,
}

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry with the same canonical name
    pub fn insert(&mut self, symptom: Symptom) -> Option<Symptom> {
        self.entries.insert(symptom.key(), symptom)
    }

    pub fn get(&self, name: &str) -> Option<&Symptom> {
        self.entries.get(&canonical_name(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Symptom> {
        self.entries.get_mut(&canonical_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Symptom> {
        self.entries.remove(&canonical_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&canonical_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical-name order
    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Symptom> {
        self.entries.values_mut()
    }

    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Symptom) -> bool,
    {
        self.entries.retain(|_, symptom| keep(symptom));
    }
}

impl FromIterator<Symptom> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        let mut set = SymptomSet::new();
        for symptom in iter {
            set.insert(symptom);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("  Headache "), "headache");
        assert_eq!(canonical_name("Blurred Vision"), "blurred vision");
    }

    #[test]
    fn test_insert_replaces_same_canonical_name() {
        let now = Utc::now();
        let mut set = SymptomSet::new();
        set.insert(Symptom::observed("Dizziness", Severity::Mild, now));
        let previous = set.insert(Symptom::observed("dizziness ", Severity::Severe, now));

        assert!(previous.is_some());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("DIZZINESS").unwrap().severity, Severity::Severe);
    }

    #[test]
    fn test_revise_rederives_advice_and_clears_localization() {
        let start = Utc::now();
        let mut symptom = Symptom::observed("aura", Severity::Mild, start);
        symptom.localized = Some(LocalizedLabel {
            name: "aura".to_string(),
            advice: "Descanse".to_string(),
        });

        let later = start + chrono::Duration::hours(1);
        symptom.revise(Severity::Moderate, later);

        assert_eq!(symptom.timestamp, later);
        assert_eq!(symptom.advice(), AdviceResolver::resolve(&Severity::Moderate));
        assert!(symptom.localized.is_none());
        assert_eq!(symptom.display_advice(), symptom.advice());
    }
}
