//! Speech collaborators and the single-session gate around capture.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kanal::AsyncSender;
use tolk_config::speech::SpeechConfig;
use tolk_core::types::{
    AppEvent, PLACEHOLDER_MESSAGE, TOO_LONG_MESSAGE, UNAVAILABLE_MESSAGE, ViewUpdate,
};

pub const RECOGNITION_UNSUPPORTED: &str = "Voice recognition is not supported on this platform.";
pub const SYNTHESIS_UNSUPPORTED: &str = "Text-to-speech is not supported on this platform.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("{0}")]
    Unsupported(&'static str),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Speech output failed: {0}")]
    Output(String),
}

/// One-shot, non-continuous speech capture
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen in `locale` until a final transcript or an error
    async fn capture(&self, locale: &str) -> Result<String, VoiceError>;

    /// End an ongoing capture early
    fn stop(&self);
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Fire and forget. Cancels whatever was being spoken.
    fn speak(&self, utterance: Utterance) -> Result<(), VoiceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: &'static str,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Only real text gets spoken, never the placeholder or an error message
pub fn is_speakable(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && text != PLACEHOLDER_MESSAGE
        && !text.contains(UNAVAILABLE_MESSAGE)
        && !text.contains(TOO_LONG_MESSAGE)
}

/// At most one recording at a time
#[derive(Clone, Default)]
pub struct VoiceSession {
    recording: Arc<AtomicBool>,
}

impl VoiceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// False if a session is already running
    pub fn try_begin(&self) -> bool {
        !self.recording.swap(true, Ordering::SeqCst)
    }

    pub fn end(&self) {
        self.recording.store(false, Ordering::SeqCst);
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }
}

/// Mic and speaker handling for the event loop
pub struct Voice {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    session: VoiceSession,
    speech: SpeechConfig,
    events: AsyncSender<AppEvent>,
    view: AsyncSender<ViewUpdate>,
}

impl Voice {
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        speech: SpeechConfig,
        events: AsyncSender<AppEvent>,
        view: AsyncSender<ViewUpdate>,
    ) -> Self {
        if recognizer.is_none() {
            tracing::warn!("Speech recognition not available");
        }
        if synthesizer.is_none() {
            tracing::warn!("Speech synthesis not available");
        }

        Self {
            recognizer,
            synthesizer,
            session: VoiceSession::new(),
            speech,
            events,
            view,
        }
    }

    pub fn session(&self) -> &VoiceSession {
        &self.session
    }

    /// Start capturing, or stop the running capture
    pub async fn toggle_mic(&self, locale: &'static str) -> anyhow::Result<()> {
        let Some(recognizer) = self.recognizer.clone() else {
            self.view
                .send(ViewUpdate::Notice(RECOGNITION_UNSUPPORTED.to_string()))
                .await?;
            return Ok(());
        };

        if !self.session.try_begin() {
            tracing::debug!("Stopping voice capture");
            recognizer.stop();
            return Ok(());
        }

        tracing::info!("Voice capture started ({})", locale);
        self.view.send(ViewUpdate::Recording(true)).await?;

        let session = self.session.clone();
        let events = self.events.clone();
        let view = self.view.clone();
        tokio::spawn(async move {
            match recognizer.capture(locale).await {
                Ok(transcript) if !transcript.trim().is_empty() => {
                    if let Err(e) = events.send(AppEvent::VoiceTranscript(transcript)).await {
                        tracing::error!("Failed to send transcript: {}", e);
                    }
                }
                Ok(_) => tracing::debug!("Voice capture ended without speech"),
                Err(e) => tracing::error!("Speech recognition error: {}", e),
            }

            session.end();
            let _ = view.send(ViewUpdate::Recording(false)).await;
        });

        Ok(())
    }

    pub async fn speak(&self, text: &str, locale: &'static str) -> anyhow::Result<()> {
        let Some(synthesizer) = &self.synthesizer else {
            self.view
                .send(ViewUpdate::Notice(SYNTHESIS_UNSUPPORTED.to_string()))
                .await?;
            return Ok(());
        };

        if !is_speakable(text) {
            return Ok(());
        }

        let utterance = Utterance {
            text: text.trim().to_string(),
            locale,
            rate: self.speech.rate,
            pitch: self.speech.pitch,
            volume: self.speech.volume,
        };

        if let Err(e) = synthesizer.speak(utterance) {
            tracing::warn!("{}", e);
        }

        Ok(())
    }
}
