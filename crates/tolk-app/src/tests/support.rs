//! In-memory collaborators for pipeline and voice tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tolk_core::LanguageCode;
use tolk_translator::{GatewayError, ProviderMetadata, TranslationGateway};

use crate::voice::{SpeechRecognizer, SpeechSynthesizer, Utterance, VoiceError};

/// Gateway answering from a fixed script. Unscripted input fails.
#[derive(Default)]
pub struct ScriptedGateway {
    translations: HashMap<String, (String, Duration)>,
    detection: Option<LanguageCode>,
    translate_calls: Mutex<Vec<String>>,
    detect_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation(self, text: &str, translated: &str) -> Self {
        self.delayed_translation(text, translated, Duration::ZERO)
    }

    pub fn delayed_translation(mut self, text: &str, translated: &str, delay: Duration) -> Self {
        self.translations
            .insert(text.to_string(), (translated.to_string(), delay));
        self
    }

    pub fn detection(mut self, code: LanguageCode) -> Self {
        self.detection = Some(code);
        self
    }

    pub fn translate_calls(&self) -> Vec<String> {
        self.translate_calls.lock().unwrap().clone()
    }

    pub fn detect_calls(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationGateway for ScriptedGateway {
    async fn translate(
        &self,
        text: &str,
        _from: Option<LanguageCode>,
        _to: LanguageCode,
    ) -> Result<String, GatewayError> {
        self.translate_calls.lock().unwrap().push(text.to_string());

        match self.translations.get(text) {
            Some((translated, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(translated.clone())
            }
            None => Err(GatewayError::ApiError("HTTP 503 Service Unavailable".into())),
        }
    }

    async fn detect_language(&self, _text: &str) -> Result<LanguageCode, GatewayError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        self.detection
            .ok_or_else(|| GatewayError::MalformedResponse("No detected language".into()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Scripted".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// Recognizer returning a canned transcript, or waiting until stopped
pub struct FakeRecognizer {
    transcript: Option<String>,
    stopped: Notify,
    locales: Mutex<Vec<String>>,
    stop_calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            stopped: Notify::new(),
            locales: Mutex::new(Vec::new()),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn blocking() -> Self {
        Self {
            transcript: None,
            stopped: Notify::new(),
            locales: Mutex::new(Vec::new()),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().unwrap().clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn capture(&self, locale: &str) -> Result<String, VoiceError> {
        self.locales.lock().unwrap().push(locale.to_string());

        match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => {
                self.stopped.notified().await;
                Ok(String::new())
            }
        }
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.stopped.notify_one();
    }
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSynthesizer {
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, utterance: Utterance) -> Result<(), VoiceError> {
        self.spoken.lock().unwrap().push(utterance);
        Ok(())
    }
}
