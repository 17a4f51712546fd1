//! Debounce, detect, translate, fall back, render.
//!
//! The pipeline is owned by the event loop and only mutated there. Gateway
//! calls run on spawned tasks and report back through the event channel,
//! tagged with the generation they were started for. Anything tagged with an
//! older generation is dropped before it reaches the view.

use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio::task::JoinHandle;
use tolk_core::types::{
    AppEvent, CharCountLevel, Outcome, PipelineState, RequestError, TOO_LONG_MESSAGE,
    TextSource, TranslationRequest, UNAVAILABLE_MESSAGE, ViewUpdate,
};
use tolk_core::{HeuristicLanguageDetector, LanguageCode, Phrasebook, SourceLanguage};
use tolk_translator::TranslationGateway;

/// Collaborators shared with in-flight request tasks
pub struct PipelineContext {
    pub gateway: Arc<dyn TranslationGateway>,
    pub detector: HeuristicLanguageDetector,
    pub phrasebook: &'static Phrasebook,
}

impl PipelineContext {
    pub fn new(gateway: Arc<dyn TranslationGateway>) -> Self {
        Self {
            gateway,
            detector: HeuristicLanguageDetector::new(),
            phrasebook: Phrasebook::builtin(),
        }
    }

    /// Concrete source language for a request. Remote detection first, the
    /// heuristic detector if that fails.
    pub async fn resolve_source(&self, request: &TranslationRequest) -> LanguageCode {
        if let SourceLanguage::Fixed(code) = request.source {
            return code;
        }

        match self.gateway.detect_language(&request.text).await {
            Ok(code) => {
                tracing::debug!(request = %request.id, "Detected {}", code);
                code
            }
            Err(e) => {
                let guess = self.detector.detect(&request.text);
                tracing::warn!(
                    request = %request.id,
                    "Language detection failed ({}), guessed {}",
                    e,
                    guess
                );
                guess
            }
        }
    }

    /// Translate with a resolved source; phrasebook on failure, fixed message if that misses too
    pub async fn translate(&self, request: &TranslationRequest, source: LanguageCode) -> Outcome {
        match self
            .gateway
            .translate(&request.text, Some(source), request.target)
            .await
        {
            Ok(text) => Outcome::Rendered { text, source },
            Err(e) => {
                tracing::warn!(request = %request.id, "Translation failed: {}", e);

                match self.phrasebook.lookup(source, request.target, &request.text) {
                    Some(phrase) => {
                        tracing::info!(request = %request.id, "Using phrasebook fallback");
                        Outcome::Fallback {
                            text: phrase.to_string(),
                            source,
                        }
                    }
                    None => Outcome::Errored {
                        message: UNAVAILABLE_MESSAGE.to_string(),
                    },
                }
            }
        }
    }

    /// Whole request, start to finish
    pub async fn execute(&self, request: &TranslationRequest) -> Outcome {
        let source = self.resolve_source(request).await;
        self.translate(request, source).await
    }
}

pub struct TranslationPipeline {
    ctx: Arc<PipelineContext>,
    /// Loopback into the event loop, for timers and request tasks
    events: AsyncSender<AppEvent>,
    view: AsyncSender<ViewUpdate>,
    debounce: Duration,

    input: String,
    source: SourceLanguage,
    target: LanguageCode,
    state: PipelineState,
    output: Outcome,

    generation: u64,
    debounce_ticket: u64,
    debounce_task: Option<JoinHandle<()>>,
}

impl TranslationPipeline {
    pub fn new(
        ctx: Arc<PipelineContext>,
        events: AsyncSender<AppEvent>,
        view: AsyncSender<ViewUpdate>,
        debounce: Duration,
        source: SourceLanguage,
        target: LanguageCode,
    ) -> Self {
        Self {
            ctx,
            events,
            view,
            debounce,
            input: String::new(),
            source,
            target,
            state: PipelineState::Idle,
            output: Outcome::Placeholder,
            generation: 0,
            debounce_ticket: 0,
            debounce_task: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &Outcome {
        &self.output
    }

    pub fn source(&self) -> SourceLanguage {
        self.source
    }

    pub fn target(&self) -> LanguageCode {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A timer is armed or a request has not rendered yet
    pub fn is_busy(&self) -> bool {
        self.debounce_task.is_some()
            || matches!(
                self.state,
                PipelineState::Pending | PipelineState::Detecting | PipelineState::Translating
            )
    }

    /// Fire an armed debounce timer now
    pub async fn flush(&mut self) -> anyhow::Result<()> {
        if self.debounce_task.is_some() {
            self.submit().await?;
        }
        Ok(())
    }

    /// Typed input. Restarts the debounce timer; only the latest text survives.
    pub async fn text_changed(&mut self, text: String) -> anyhow::Result<()> {
        self.set_input(text, TextSource::Typed).await?;
        self.restart_debounce();
        Ok(())
    }

    pub async fn debounce_elapsed(&mut self, ticket: u64) -> anyhow::Result<()> {
        if ticket != self.debounce_ticket || self.debounce_task.is_none() {
            tracing::debug!("Ignoring stale debounce timer {}", ticket);
            return Ok(());
        }

        self.debounce_task = None;
        self.submit().await
    }

    /// Transcripts skip the debounce
    pub async fn voice_transcript(&mut self, text: String) -> anyhow::Result<()> {
        self.set_input(text, TextSource::Voice).await?;
        self.submit().await
    }

    pub async fn set_source(&mut self, source: SourceLanguage) -> anyhow::Result<()> {
        self.source = source;
        self.send_languages().await?;
        self.submit().await
    }

    pub async fn set_target(&mut self, target: LanguageCode) -> anyhow::Result<()> {
        self.target = target;
        self.send_languages().await?;
        self.submit().await
    }

    /// Exchange languages and texts. No-op while the source is auto-detected.
    pub async fn swap(&mut self) -> anyhow::Result<()> {
        let SourceLanguage::Fixed(source) = self.source else {
            tracing::debug!("Swap ignored, source language is auto");
            return Ok(());
        };

        let target = self.target;
        self.source = SourceLanguage::Fixed(target);
        self.target = source;

        let new_input = if self.output.has_translation() {
            self.output.display_text().to_string()
        } else {
            String::new()
        };
        let old_input = std::mem::replace(&mut self.input, new_input);

        let swapped = if old_input.trim().is_empty() {
            Outcome::Placeholder
        } else {
            Outcome::Rendered {
                text: old_input,
                source,
            }
        };

        self.send_languages().await?;
        self.send_input(TextSource::Swap).await?;
        self.render(swapped).await?;

        if self.input.trim().is_empty() {
            // Nothing to translate; keep anything in flight from rendering
            self.cancel_debounce();
            self.generation += 1;
            Ok(())
        } else {
            self.submit().await
        }
    }

    /// Start a new request generation for the current input, right away
    pub async fn submit(&mut self) -> anyhow::Result<()> {
        self.cancel_debounce();
        self.generation += 1;
        let generation = self.generation;

        let request = match TranslationRequest::new(&self.input, self.source, self.target) {
            Ok(request) => request,
            Err(RequestError::Empty) => return self.render(Outcome::Placeholder).await,
            Err(e @ RequestError::TooLong { .. }) => {
                tracing::warn!("Rejected request: {}", e);
                return self
                    .render(Outcome::Errored {
                        message: TOO_LONG_MESSAGE.to_string(),
                    })
                    .await;
            }
        };

        tracing::debug!(
            request = %request.id,
            generation,
            "Submitting {} chars, {} -> {}",
            request.text.chars().count(),
            request.source,
            request.target
        );

        self.state = PipelineState::Pending;
        self.view.send(ViewUpdate::Loading).await?;

        let ctx = self.ctx.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if request.source.is_auto() {
                report(&events, AppEvent::PhaseChanged {
                    generation,
                    state: PipelineState::Detecting,
                })
                .await;
            }
            let source = ctx.resolve_source(&request).await;

            report(&events, AppEvent::PhaseChanged {
                generation,
                state: PipelineState::Translating,
            })
            .await;

            let outcome = ctx.translate(&request, source).await;
            report(&events, AppEvent::TranslationFinished {
                generation,
                outcome,
            })
            .await;
        });

        Ok(())
    }

    pub fn phase_changed(&mut self, generation: u64, state: PipelineState) {
        if generation == self.generation && !self.state.is_terminal() {
            tracing::debug!(generation, "State {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub async fn translation_finished(
        &mut self,
        generation: u64,
        outcome: Outcome,
    ) -> anyhow::Result<()> {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding superseded result"
            );
            return Ok(());
        }

        self.render(outcome).await
    }

    async fn render(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        self.state = outcome.state();
        self.view
            .send(ViewUpdate::Output {
                state: self.state,
                result: outcome.result(),
            })
            .await?;
        self.output = outcome;
        Ok(())
    }

    async fn set_input(&mut self, text: String, origin: TextSource) -> anyhow::Result<()> {
        self.input = text;
        self.send_input(origin).await
    }

    async fn send_input(&self, origin: TextSource) -> anyhow::Result<()> {
        let chars = self.input.chars().count();
        self.view
            .send(ViewUpdate::Input {
                text: self.input.clone(),
                chars,
                level: CharCountLevel::for_count(chars),
                source: origin,
            })
            .await?;
        Ok(())
    }

    async fn send_languages(&self) -> anyhow::Result<()> {
        self.view
            .send(ViewUpdate::Languages {
                source: self.source,
                target: self.target,
            })
            .await?;
        Ok(())
    }

    fn restart_debounce(&mut self) {
        self.cancel_debounce();
        self.debounce_ticket += 1;

        let ticket = self.debounce_ticket;
        let delay = self.debounce;
        let events = self.events.clone();
        self.debounce_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            report(&events, AppEvent::DebounceElapsed { ticket }).await;
        }));
    }

    fn cancel_debounce(&mut self) {
        if let Some(task) = self.debounce_task.take() {
            task.abort();
        }
    }
}

impl Drop for TranslationPipeline {
    fn drop(&mut self) {
        self.cancel_debounce();
    }
}

async fn report(events: &AsyncSender<AppEvent>, event: AppEvent) {
    if let Err(e) = events.send(event).await {
        tracing::error!("Failed to report to event loop: {}", e);
    }
}
