//! Async session controller
//!
//! Wires the pure `SessionState` to its collaborators. The state lock is
//! never held across a language model call, so reminder ticks keep running
//! while a reply is pending; a language change holds it for the whole batch
//! so no reply lands half-way through a retranslation.

use crate::clock::Clock;
use crate::errors::{Result, TrackerError};
use crate::llm::{LanguageModelService, ResponseParser};
use crate::notify::NotificationService;
use crate::reminder::{ReminderDue, ReminderInterval};
use crate::session::state::{
    AssistantReply, RetranslationReport, SessionEffect, SessionState, SymptomLocalization,
    APOLOGY,
};
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::timeline::{AdviceResolver, TimelineReconciler};
use crate::translation::{TranslationOrchestrator, TranslationService};
use crate::types::{canonical_name, Language, RiskLevel, StructuredUpdate};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// External collaborators of a session
#[derive(Clone)]
pub struct SessionServices {
    pub llm: Arc<dyn LanguageModelService>,
    pub translator: Arc<dyn TranslationService>,
    pub notifier: Arc<dyn NotificationService>,
    pub clock: Arc<dyn Clock>,
}

/// Result of a successful send
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// Reply as shown to the user
    pub reply: String,
    pub risk: RiskLevel,
    /// False when the service failed and the apology was recorded
    pub answered: bool,
    /// False when the reply was not valid structured output
    pub structured: bool,
}

pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    llm: Arc<dyn LanguageModelService>,
    translator: TranslationOrchestrator,
    notifier: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
    reconciler: TimelineReconciler,
    telemetry: TelemetryCollector,
}

impl SessionController {
    pub fn new(state: SessionState, services: SessionServices, telemetry: TelemetryCollector) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            llm: services.llm,
            translator: TranslationOrchestrator::new(services.translator, telemetry.clone()),
            notifier: services.notifier,
            clock: services.clock,
            reconciler: TimelineReconciler::new(),
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Copy of the current session state
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Send a user message and apply the reply
    ///
    /// Service failures are not errors: the apology is recorded and returned
    /// with `answered == false`. Errors are only returned for rejected input.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let pending = {
            let mut state = self.state.lock().await;
            match state.begin_send(text, self.clock.now()) {
                Ok(pending) => pending,
                Err(e) => {
                    if matches!(e, TrackerError::SendInFlight) {
                        self.telemetry.record(TelemetryEvent::SendRejected);
                    }
                    debug!(error = %e, "send rejected");
                    return Err(e);
                }
            }
        };
        let language = pending.language;
        let mut guard = PendingGuard {
            state: self.state.clone(),
            clock: self.clock.clone(),
            turn_id: Some(pending.turn_id),
        };

        let outbound = self
            .translator
            .to_canonical(&pending.request.user_message, language)
            .await;
        if !language.is_canonical() {
            self.state
                .lock()
                .await
                .set_canonical_text(pending.turn_id, &outbound);
        }
        let request = pending.request.with_user_message(outbound);

        let started = Instant::now();
        let (reply, structured) = match self.llm.complete(&request).await {
            Ok(raw) => {
                self.telemetry.record(TelemetryEvent::ReplyReceived {
                    duration_ms: started.elapsed().as_millis() as u64,
                });
                let parsed = ResponseParser::parse(&raw);
                if !parsed.structured {
                    self.telemetry.record(TelemetryEvent::ParseFallback);
                }
                (self.localize_reply(parsed.update, language).await, parsed.structured)
            }
            Err(e) => {
                warn!(error = %e, "language model request failed");
                self.telemetry.record(TelemetryEvent::ServiceFailure {
                    error: e.to_string(),
                });
                let mut reply = AssistantReply::service_failure(language);
                reply.localized = self.translator.localize(APOLOGY, language).await;
                (reply, false)
            }
        };
        let answered = reply.update.is_some();

        let applied = {
            let mut state = self.state.lock().await;
            guard.disarm();
            state.complete_send(reply, self.clock.now(), &self.reconciler)
        };

        if let Some(stats) = &applied.stats {
            self.telemetry.record(TelemetryEvent::Reconciled {
                symptoms: stats.staged + stats.updated + stats.removed,
                evicted: stats.evicted,
            });
        }
        info!(risk = %applied.risk, answered, structured, "reply applied");

        Ok(SendOutcome {
            reply: applied.display_text,
            risk: applied.risk,
            answered,
            structured,
        })
    }

    /// Translate the reply and the symptom labels it introduces
    async fn localize_reply(&self, update: StructuredUpdate, language: Language) -> AssistantReply {
        let mut reply = AssistantReply::from_update(update, language);
        if language.is_canonical() {
            return reply;
        }

        reply.localized = self.translator.localize(&reply.text, language).await;

        let mut names = BTreeSet::new();
        let mut advice = BTreeSet::new();
        if let Some(update) = &reply.update {
            let state = self.state.lock().await;
            let observations = update.symptoms.iter().chain(&update.symptom_actions.update);
            for observation in observations {
                if observation.name.trim().is_empty() {
                    continue;
                }
                names.insert(observation.name.trim().to_string());
                match &observation.severity {
                    Some(severity) => {
                        advice.insert(AdviceResolver::resolve(severity).to_string());
                    }
                    // A revision without severity keeps the tracked one.
                    None => {
                        let key = canonical_name(&observation.name);
                        if let Some(existing) = state.symptoms().get(&key) {
                            advice.insert(existing.advice().to_string());
                        }
                    }
                }
            }
        }

        let texts: Vec<String> = names.iter().chain(&advice).cloned().collect();
        let mut results = self
            .translator
            .translate_batch(&texts, language)
            .await
            .into_iter();

        let mut labels = SymptomLocalization::default();
        for name in &names {
            if let Some(translated) = results.next().flatten() {
                labels.names.insert(canonical_name(name), translated);
            }
        }
        for text in &advice {
            if let Some(translated) = results.next().flatten() {
                labels.advice.insert(text.clone(), translated);
            }
        }
        reply.symptom_labels = labels;

        reply
    }

    /// Run one reminder check and carry out its effects
    pub async fn tick(&self) -> Option<ReminderDue> {
        let outcome = {
            let mut state = self.state.lock().await;
            state.tick(self.clock.now())
        }?;

        self.telemetry.record(TelemetryEvent::ReminderFired);
        info!(next_due_at = %outcome.due.next_due_at, "reminder fired");

        for effect in outcome.effects {
            match effect {
                SessionEffect::Notify { title, body } => self.notifier.fire(&title, &body),
                SessionEffect::LocalizeTurn {
                    turn_id,
                    text,
                    language,
                } => {
                    if let Some(localized) = self.translator.localize(&text, language).await {
                        let mut state = self.state.lock().await;
                        if state.language() == language {
                            state.set_turn_localization(turn_id, localized);
                        }
                    }
                }
            }
        }

        Some(outcome.due)
    }

    /// Switch the display language and retranslate the whole session
    pub async fn change_language(&self, language: Language) -> RetranslationReport {
        let mut state = self.state.lock().await;
        if state.language() == language {
            return RetranslationReport::default();
        }

        let plan = state.retranslation_plan();
        let results = if language.is_canonical() {
            Vec::new()
        } else {
            self.translator.translate_batch(&plan.texts, language).await
        };

        let report = state.apply_retranslation(language, &plan, results);
        info!(
            language = language.code(),
            translated = report.translated,
            kept = report.kept,
            "language changed"
        );
        report
    }

    /// Change the reminder interval; accepts 4, 8, 12 or 24 hours
    pub async fn set_reminder_interval(&self, hours: u32) -> Result<ReminderInterval> {
        let interval = ReminderInterval::try_from(hours)?;
        self.state.lock().await.set_reminder_interval(interval);
        info!(hours, "reminder interval changed");
        Ok(interval)
    }

    pub async fn set_notifications(&self, enabled: bool) {
        self.state.lock().await.set_notifications(enabled);
    }
}

/// Closes the pending send if `send_message` is dropped before the reply
/// is applied
struct PendingGuard {
    state: Arc<Mutex<SessionState>>,
    clock: Arc<dyn Clock>,
    turn_id: Option<Uuid>,
}

impl PendingGuard {
    fn disarm(&mut self) {
        self.turn_id = None;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let Some(turn_id) = self.turn_id.take() else {
            return;
        };
        let now = self.clock.now();
        warn!(%turn_id, "send abandoned before the reply arrived");

        if let Ok(mut state) = self.state.try_lock() {
            state.abandon_send(turn_id, now);
            return;
        }
        // Lock is busy (tick or language change): finish on the runtime.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = self.state.clone();
                handle.spawn(async move {
                    state.lock().await.abandon_send(turn_id, now);
                });
            }
            Err(_) => warn!(%turn_id, "no runtime to release the pending send"),
        }
    }
}
