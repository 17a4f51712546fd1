use std::env;

use serde::{Deserialize, Serialize};

use self::gateway::GatewayConfig;
use self::pipeline::PipelineConfig;
use self::speech::SpeechConfig;

pub mod gateway;
pub mod pipeline;
pub mod speech;

pub use gateway::GatewayProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub pipeline: PipelineConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Defaults overlaid with `TOLK_*` environment variables
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    /// Overlay values from `lookup` (usually the process environment).
    /// Unparseable values are ignored and the current value kept.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.gateway.apply_env(&lookup);
        self.pipeline.apply_env(&lookup);
        self.speech.apply_env(&lookup);
    }
}

/// Parse an env value, keeping `current` when absent or invalid
pub(crate) fn env_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    current: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(current)
}
