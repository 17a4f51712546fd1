use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tolk_core::types::{AppEvent, ViewUpdate};
use tolk_translator::TranslationGateway;

use crate::events::event_loop;
use crate::pipeline::{PipelineContext, TranslationPipeline};
use crate::state::AppState;
use crate::voice::{SpeechRecognizer, SpeechSynthesizer, Voice};

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub view: (AsyncSender<ViewUpdate>, AsyncReceiver<ViewUpdate>),
}

impl ChannelSet {
    pub fn new(event_capacity: usize, view_capacity: usize) -> Self {
        Self {
            events: kanal::bounded_async(event_capacity), // keystrokes, timers, request results
            view: kanal::bounded_async(view_capacity),    // output surface
        }
    }
}

/// Speech capabilities available on this platform
#[derive(Default, Clone)]
pub struct VoiceBackends {
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(state: Arc<AppState>) -> Self {
        let channels = {
            let config = state.config.read().await;
            ChannelSet::new(
                config.pipeline.event_capacity,
                config.pipeline.view_capacity,
            )
        };

        Self {
            channels,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Front ends push `AppEvent`s here
    pub fn event_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.events.0.clone()
    }

    /// View surfaces read `ViewUpdate`s here
    pub fn view_receiver(&self) -> AsyncReceiver<ViewUpdate> {
        self.channels.view.1.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub async fn spawn_tasks(
        &self,
        gateway: Arc<dyn TranslationGateway>,
        voice: VoiceBackends,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        let (pipeline, voice) = {
            let config = self.state.config.read().await;

            let pipeline = TranslationPipeline::new(
                Arc::new(PipelineContext::new(gateway)),
                self.channels.events.0.clone(),
                self.channels.view.0.clone(),
                config.pipeline.debounce(),
                config.pipeline.source,
                config.pipeline.target,
            );

            let voice = Voice::new(
                voice.recognizer,
                voice.synthesizer,
                config.speech.clone(),
                self.channels.events.0.clone(),
                self.channels.view.0.clone(),
            );

            (pipeline, voice)
        };

        // Event loop
        tasks.spawn(event_loop(
            pipeline,
            voice,
            self.channels.events.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
