//! Session state and its pure transitions
//!
//! `SessionState` is the single owner of the conversation log, the symptom
//! set, the session risk and the reminder schedule. Its methods never perform
//! I/O: anything that must happen outside the state (notifications, late
//! translations) is handed back as a `SessionEffect` for the controller to
//! carry out.

use crate::errors::{Result, TrackerError};
use crate::llm::{ChatRequest, DEFAULT_HISTORY_WINDOW};
use crate::notify::{REMINDER_BODY, REMINDER_TITLE};
use crate::reminder::{ReminderDue, ReminderInterval, ReminderScheduler};
use crate::timeline::{ReconcileStats, RiskAdopter, TimelineReconciler};
use crate::types::{
    ConversationTurn, Language, LocalizedLabel, RiskLevel, StructuredUpdate, SymptomSet,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Opening assistant turn of every session
pub const GREETING: &str = "Hi, how are you feeling today?";

/// Reply recorded when the language model service fails
pub const APOLOGY: &str =
    "I apologize, but I'm having trouble responding right now. Please try again in a moment.";

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Fire a notification
    Notify { title: String, body: String },
    /// Translate a turn's text and attach it with `set_turn_localization`
    LocalizeTurn {
        turn_id: Uuid,
        text: String,
        language: Language,
    },
}

/// Outbound chat request produced by `begin_send`
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub turn_id: Uuid,
    pub request: ChatRequest,
    pub language: Language,
}

/// Localized symptom strings gathered before a reply is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomLocalization {
    /// Canonical symptom key → localized name
    pub names: HashMap<String, String>,
    /// Canonical advice text → localized advice
    pub advice: HashMap<String, String>,
}

impl SymptomLocalization {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.advice.is_empty()
    }

    /// Attach labels to entries that have none
    ///
    /// Name and advice are applied independently; a half with no
    /// translation shows the canonical text.
    fn apply(&self, symptoms: &mut SymptomSet) {
        for entry in symptoms.iter_mut().filter(|entry| entry.localized.is_none()) {
            let name = self.names.get(&entry.key());
            let advice = self.advice.get(entry.advice());
            if name.is_none() && advice.is_none() {
                continue;
            }
            entry.localized = Some(LocalizedLabel {
                name: name.cloned().unwrap_or_else(|| entry.name.clone()),
                advice: advice.cloned().unwrap_or_else(|| entry.advice().to_string()),
            });
        }
    }
}

/// Assistant reply ready to be applied to the session
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// `None` when the service failed and no update exists
    pub update: Option<StructuredUpdate>,
    /// Reply text in the canonical language
    pub text: String,
    /// Reply text in `language`, when translated
    pub localized: Option<String>,
    pub symptom_labels: SymptomLocalization,
    /// Language the localized strings were produced for
    pub language: Language,
}

impl AssistantReply {
    pub fn from_update(update: StructuredUpdate, language: Language) -> Self {
        Self {
            text: update.message.clone(),
            update: Some(update),
            localized: None,
            symptom_labels: SymptomLocalization::default(),
            language,
        }
    }

    pub fn service_failure(language: Language) -> Self {
        Self {
            update: None,
            text: APOLOGY.to_string(),
            localized: None,
            symptom_labels: SymptomLocalization::default(),
            language,
        }
    }
}

/// What applying a reply did
#[derive(Debug, Clone)]
pub struct AppliedReply {
    pub turn_id: Uuid,
    pub display_text: String,
    /// Present when a reconciliation pass ran
    pub stats: Option<ReconcileStats>,
    pub risk: RiskLevel,
}

/// A fired reminder and the effects it requests
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub due: ReminderDue,
    pub turn_id: Uuid,
    pub effects: Vec<SessionEffect>,
}

/// Fields to retranslate on a language change, in batch order
#[derive(Debug, Clone, Default)]
pub struct RetranslationPlan {
    pub turn_ids: Vec<Uuid>,
    pub symptom_keys: Vec<String>,
    /// Turn texts first, then each symptom's name and advice
    pub texts: Vec<String>,
}

/// Outcome of a language change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetranslationReport {
    pub translated: usize,
    pub kept: usize,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    history: Vec<ConversationTurn>,
    symptoms: SymptomSet,
    risk: RiskLevel,
    reminder: ReminderScheduler,
    language: Language,
    notifications_enabled: bool,
    history_window: usize,
    /// User turn whose reply is still outstanding
    pending_turn: Option<Uuid>,
}

impl SessionState {
    /// Fresh session: greeting turn, empty symptoms, low risk, reminder armed
    pub fn new(interval: ReminderInterval, language: Language, now: DateTime<Utc>) -> Self {
        let mut reminder = ReminderScheduler::new(interval);
        reminder.initialize(now);

        Self {
            history: vec![ConversationTurn::assistant(GREETING, now)],
            symptoms: SymptomSet::new(),
            risk: RiskLevel::default(),
            reminder,
            language,
            notifications_enabled: true,
            history_window: DEFAULT_HISTORY_WINDOW,
            pending_turn: None,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn symptoms(&self) -> &SymptomSet {
        &self.symptoms
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    pub fn reminder(&self) -> &ReminderScheduler {
        &self.reminder
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending_turn.is_some()
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    pub fn set_reminder_interval(&mut self, interval: ReminderInterval) {
        self.reminder.set_interval(interval);
    }

    /// Record the user's turn and produce the outbound request
    ///
    /// Rejected while a reply is pending; there is no queue.
    pub fn begin_send(&mut self, text: &str, now: DateTime<Utc>) -> Result<PendingSend> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TrackerError::EmptyMessage);
        }
        if self.pending_turn.is_some() {
            return Err(TrackerError::SendInFlight);
        }

        let request = ChatRequest::for_conversation(&self.history, self.history_window, text);
        let turn = ConversationTurn::user(text, now);
        let turn_id = turn.id;
        self.history.push(turn);
        self.pending_turn = Some(turn_id);

        Ok(PendingSend {
            turn_id,
            request,
            language: self.language,
        })
    }

    /// Store the canonical translation of a user turn, keeping what the
    /// user typed as its display text
    pub fn set_canonical_text(&mut self, turn_id: Uuid, canonical: &str) {
        if let Some(turn) = self.turn_mut(turn_id) {
            if turn.text != canonical {
                let typed = std::mem::replace(&mut turn.text, canonical.to_string());
                turn.localized.get_or_insert(typed);
            }
        }
    }

    /// Attach a display translation to a turn
    pub fn set_turn_localization(&mut self, turn_id: Uuid, localized: String) {
        if let Some(turn) = self.turn_mut(turn_id) {
            turn.localized = Some(localized);
        }
    }

    /// Apply a reply: reconcile symptoms, adopt risk, record the turn
    ///
    /// The reconciled set replaces the old one in a single assignment.
    pub fn complete_send(
        &mut self,
        reply: AssistantReply,
        now: DateTime<Utc>,
        reconciler: &TimelineReconciler,
    ) -> AppliedReply {
        self.pending_turn = None;

        // Strings localized for a language the session has since left are stale.
        let current_language = reply.language == self.language;

        let mut stats = None;
        if let Some(update) = &reply.update {
            let reconciliation = reconciler.reconcile(&self.symptoms, update, now);
            let mut symptoms = reconciliation.symptoms;
            if current_language {
                reply.symptom_labels.apply(&mut symptoms);
            }
            self.symptoms = symptoms;
            self.risk = RiskAdopter::adopt(self.risk, update);
            stats = Some(reconciliation.stats);
        }

        let mut turn = ConversationTurn::assistant(reply.text, now);
        if current_language {
            turn.localized = reply.localized;
        }
        let turn_id = turn.id;
        let display_text = turn.display_text().to_string();
        self.history.push(turn);

        AppliedReply {
            turn_id,
            display_text,
            stats,
            risk: self.risk,
        }
    }

    /// Close a send whose reply will never arrive
    ///
    /// Records the apology so the user turn is not left unanswered. Does
    /// nothing unless `turn_id` is the pending turn.
    pub fn abandon_send(&mut self, turn_id: Uuid, now: DateTime<Utc>) -> bool {
        if self.pending_turn != Some(turn_id) {
            return false;
        }
        self.pending_turn = None;
        self.history.push(ConversationTurn::assistant(APOLOGY, now));
        true
    }

    /// Evaluate the reminder schedule; on a due event, record the reminder
    /// turn and request the notification
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TickOutcome> {
        let due = self.reminder.check(now)?;

        let turn = ConversationTurn::assistant(REMINDER_BODY, now);
        let turn_id = turn.id;
        self.history.push(turn);

        let mut effects = Vec::new();
        if self.notifications_enabled {
            effects.push(SessionEffect::Notify {
                title: REMINDER_TITLE.to_string(),
                body: REMINDER_BODY.to_string(),
            });
        }
        if !self.language.is_canonical() {
            effects.push(SessionEffect::LocalizeTurn {
                turn_id,
                text: REMINDER_BODY.to_string(),
                language: self.language,
            });
        }

        Some(TickOutcome {
            due,
            turn_id,
            effects,
        })
    }

    /// Every translatable field of the session, in batch order
    pub fn retranslation_plan(&self) -> RetranslationPlan {
        let mut plan = RetranslationPlan::default();

        for turn in &self.history {
            plan.turn_ids.push(turn.id);
            plan.texts.push(turn.text.clone());
        }
        for symptom in self.symptoms.iter() {
            plan.symptom_keys.push(symptom.key());
            plan.texts.push(symptom.name.clone());
            plan.texts.push(symptom.advice().to_string());
        }

        plan
    }

    /// Switch language and apply batch results from `retranslation_plan`
    ///
    /// A `None` result keeps that field's current display value. Switching to
    /// the canonical language drops all display translations instead.
    pub fn apply_retranslation(
        &mut self,
        language: Language,
        plan: &RetranslationPlan,
        results: Vec<Option<String>>,
    ) -> RetranslationReport {
        self.language = language;
        let mut report = RetranslationReport::default();

        if language.is_canonical() {
            for turn in &mut self.history {
                turn.localized = None;
            }
            for symptom in self.symptoms.iter_mut() {
                symptom.localized = None;
            }
            return report;
        }

        let mut results = results.into_iter();
        let mut next = |report: &mut RetranslationReport| {
            let result = results.next().flatten();
            match result {
                Some(_) => report.translated += 1,
                None => report.kept += 1,
            }
            result
        };

        for turn_id in &plan.turn_ids {
            let translated = next(&mut report);
            if let (Some(turn), Some(text)) = (self.turn_mut(*turn_id), translated) {
                turn.localized = Some(text);
            }
        }

        for key in &plan.symptom_keys {
            let name = next(&mut report);
            let advice = next(&mut report);
            if let Some(symptom) = self.symptoms.get_mut(key) {
                let label = LocalizedLabel {
                    name: name.unwrap_or_else(|| symptom.display_name().to_string()),
                    advice: advice.unwrap_or_else(|| symptom.display_advice().to_string()),
                };
                symptom.localized = Some(label);
            }
        }

        report
    }

    fn turn_mut(&mut self, turn_id: Uuid) -> Option<&mut ConversationTurn> {
        self.history.iter_mut().rev().find(|turn| turn.id == turn_id)
    }
}
