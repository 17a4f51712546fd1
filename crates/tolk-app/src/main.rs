use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tolk_config::{Config, GatewayProvider};
use tolk_core::{LanguageCode, SourceLanguage};
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod gateway;
pub mod pipeline;
pub mod settings;
pub mod state;
pub mod terminal;
pub mod voice;

#[cfg(test)]
mod tests;

use self::controller::{AppController, VoiceBackends};
use self::state::AppState;

/// Type or pipe text, get it translated as you go
#[derive(Parser, Debug)]
#[command(name = "tolk", version, about)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Translation backend (google, mymemory)
    #[arg(short, long)]
    provider: Option<GatewayProvider>,

    /// Source language code, or "auto"
    #[arg(short, long)]
    from: Option<SourceLanguage>,

    /// Target language code
    #[arg(short, long)]
    to: Option<LanguageCode>,

    /// Quiet period before translating typed input
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.gateway.provider = provider;
        }
        if let Some(from) = self.from {
            config.pipeline.source = from;
        }
        if let Some(to) = self.to {
            config.pipeline.target = to;
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.pipeline.debounce_ms = debounce_ms;
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let json_logs = args.json_logs
        || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_tracing(json_logs);

    let mut config = settings::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    tracing::info!(
        "Translating {} -> {} via {}",
        config.pipeline.source,
        config.pipeline.target,
        config.gateway.provider
    );

    let gateway = gateway::build_gateway(&config.gateway)?;
    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state).await;

    // No speech APIs on a terminal
    let voice = VoiceBackends::default();
    let help = terminal::help_text(voice.recognizer.is_some(), voice.synthesizer.is_some());

    let mut tasks = controller.spawn_tasks(gateway, voice).await;
    tasks.spawn(terminal::render_view(
        controller.view_receiver(),
        controller.cancel_token().child_token(),
    ));
    terminal::spawn_input_thread(controller.event_sender(), help)?;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::debug!("Task exited"),
                Some(Ok(Err(e))) => tracing::error!("Task failed: {e}"),
                Some(Err(e)) => tracing::error!("Task panicked: {e}"),
                None => {}
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Task failed during shutdown: {e}"),
            Err(e) => tracing::error!("Task panicked during shutdown: {e}"),
        }
    }

    Ok(())
}
