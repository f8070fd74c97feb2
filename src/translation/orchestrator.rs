//! Fail-soft translation orchestration
//!
//! Every call either returns translated text or reports that the original
//! should be kept. Failures are logged and counted, never propagated.

use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::translation::TranslationService;
use crate::types::Language;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct TranslationOrchestrator {
    service: Arc<dyn TranslationService>,
    telemetry: TelemetryCollector,
}

impl TranslationOrchestrator {
    pub fn new(service: Arc<dyn TranslationService>, telemetry: TelemetryCollector) -> Self {
        Self { service, telemetry }
    }

    /// Translate `text`, or `None` if the service failed
    ///
    /// Blank text is returned as is without a service call.
    pub async fn try_translate(&self, text: &str, target: Language) -> Option<String> {
        if text.trim().is_empty() {
            return Some(text.to_string());
        }

        match self.service.translate(text, target).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                warn!(error = %e, target = target.code(), "translation failed; keeping original text");
                self.telemetry.record(TelemetryEvent::TranslationFailure {
                    error: e.to_string(),
                });
                None
            }
        }
    }

    /// Translate `text`, keeping it unchanged on failure
    pub async fn translate_or_keep(&self, text: &str, target: Language) -> String {
        self.try_translate(text, target)
            .await
            .unwrap_or_else(|| text.to_string())
    }

    /// Outbound: user input into the canonical working language
    pub async fn to_canonical(&self, text: &str, active: Language) -> String {
        if active.is_canonical() {
            return text.to_string();
        }
        self.translate_or_keep(text, Language::CANONICAL).await
    }

    /// Inbound: canonical text into the active language
    ///
    /// `None` means "show the canonical text", either because no
    /// translation is needed or because it failed.
    pub async fn localize(&self, text: &str, active: Language) -> Option<String> {
        if active.is_canonical() {
            return None;
        }
        self.try_translate(text, active).await
    }

    /// Translate many fields concurrently, one result per input in order
    ///
    /// A failed field yields `None` so the caller keeps its current value.
    pub async fn translate_batch(&self, texts: &[String], target: Language) -> Vec<Option<String>> {
        debug!(fields = texts.len(), target = target.code(), "translating batch");
        join_all(texts.iter().map(|text| self.try_translate(text, target))).await
    }
}
