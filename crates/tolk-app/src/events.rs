use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use tolk_core::types::{AppEvent, SpeakTarget};

use crate::pipeline::TranslationPipeline;
use crate::voice::Voice;

/// App's main loop. Owns the pipeline; every state change happens here.
pub async fn event_loop(
    mut pipeline: TranslationPipeline,
    voice: Voice,
    events_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    let mut shutting_down = false;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = events_rx.recv() => event?,
        };

        if !handle_event(&mut pipeline, &voice, event).await? && !shutting_down {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            shutting_down = true;
            pipeline.flush().await?;
        }

        // Let the last request render before leaving
        if shutting_down && !pipeline.is_busy() {
            cancel.cancel();
            break;
        }
    }

    Ok(())
}

/// Returns false when the loop should stop
async fn handle_event(
    pipeline: &mut TranslationPipeline,
    voice: &Voice,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::TextChanged(text) => {
            tracing::debug!("TextChanged: {} chars", text.chars().count());
            pipeline.text_changed(text).await?;
        }
        AppEvent::DebounceElapsed { ticket } => {
            pipeline.debounce_elapsed(ticket).await?;
        }
        AppEvent::VoiceTranscript(text) => {
            tracing::info!("Voice transcript: {} chars", text.chars().count());
            pipeline.voice_transcript(text).await?;
        }
        AppEvent::SetSource(source) => {
            tracing::debug!("Source language -> {}", source);
            pipeline.set_source(source).await?;
        }
        AppEvent::SetTarget(target) => {
            tracing::debug!("Target language -> {}", target);
            pipeline.set_target(target).await?;
        }
        AppEvent::Swap => {
            pipeline.swap().await?;
        }
        AppEvent::ToggleMic => {
            voice.toggle_mic(pipeline.source().speech_locale()).await?;
        }
        AppEvent::Speak(SpeakTarget::Input) => {
            voice
                .speak(pipeline.input(), pipeline.source().speech_locale())
                .await?;
        }
        AppEvent::Speak(SpeakTarget::Output) => {
            voice
                .speak(
                    pipeline.output().display_text(),
                    pipeline.target().speech_locale(),
                )
                .await?;
        }
        AppEvent::PhaseChanged { generation, state } => {
            pipeline.phase_changed(generation, state);
        }
        AppEvent::TranslationFinished {
            generation,
            outcome,
        } => {
            pipeline.translation_finished(generation, outcome).await?;
        }
        AppEvent::Shutdown => return Ok(false),
    }

    Ok(true)
}
