use std::time::Duration;

use serde::{Deserialize, Serialize};
use tolk_core::{LanguageCode, SourceLanguage};

use crate::env_or;

fn default_debounce_ms() -> u64 {
    500
}

fn default_target() -> LanguageCode {
    LanguageCode::Id
}

fn default_event_capacity() -> usize {
    64
}

fn default_view_capacity() -> usize {
    256
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Quiet period after the last keystroke before translating
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub source: SourceLanguage,
    #[serde(default = "default_target")]
    pub target: LanguageCode,
    /// Front end -> pipeline channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Pipeline -> view channel
    #[serde(default = "default_view_capacity")]
    pub view_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            source: SourceLanguage::default(),
            target: default_target(),
            event_capacity: default_event_capacity(),
            view_capacity: default_view_capacity(),
        }
    }
}

impl PipelineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        self.debounce_ms = env_or(lookup, "TOLK_DEBOUNCE_MS", self.debounce_ms);
        self.source = env_or(lookup, "TOLK_FROM", self.source);
        self.target = env_or(lookup, "TOLK_TO", self.target);
    }
}
