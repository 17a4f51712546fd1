use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_rate() -> f32 {
    0.8
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

/// Text-to-speech voice settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    #[serde(default = "default_rate")]
    pub rate: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

impl SpeechConfig {
    pub(crate) fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        self.rate = env_or(lookup, "TOLK_SPEECH_RATE", self.rate);
        self.pitch = env_or(lookup, "TOLK_SPEECH_PITCH", self.pitch);
        self.volume = env_or(lookup, "TOLK_SPEECH_VOLUME", self.volume);
    }
}
