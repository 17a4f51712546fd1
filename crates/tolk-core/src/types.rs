use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::{LanguageCode, SourceLanguage};

/// Upper bound on input length, in characters
pub const MAX_INPUT_CHARS: usize = 5000;
const WARNING_CHARS: usize = 4000;
const CRITICAL_CHARS: usize = 4500;

pub const PLACEHOLDER_MESSAGE: &str = "Translation will appear here...";
pub const UNAVAILABLE_MESSAGE: &str = "translation unavailable";
pub const TOO_LONG_MESSAGE: &str = "text too long to translate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: Uuid,
    pub text: String,
    pub source: SourceLanguage,
    pub target: LanguageCode,
}

impl TranslationRequest {
    pub fn new(
        text: &str,
        source: SourceLanguage,
        target: LanguageCode,
    ) -> Result<Self, RequestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::Empty);
        }

        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(RequestError::TooLong {
                chars,
                max: MAX_INPUT_CHARS,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            source,
            target,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Nothing to translate")]
    Empty,

    #[error("Input is {chars} characters, limit is {max}")]
    TooLong { chars: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationResult {
    Translated { text: String },
    Failed { reason: String },
}

/// Where a request currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineState {
    #[default]
    Idle,
    Pending,
    Detecting,
    Translating,
    Rendered,
    Fallback,
    Errored,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Rendered | PipelineState::Fallback | PipelineState::Errored
        )
    }
}

/// Final result of one request, ready for the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Placeholder for empty input
    Placeholder,
    Rendered {
        text: String,
        source: LanguageCode,
    },
    Fallback {
        text: String,
        source: LanguageCode,
    },
    Errored {
        message: String,
    },
}

impl Outcome {
    pub fn state(&self) -> PipelineState {
        match self {
            Outcome::Placeholder | Outcome::Rendered { .. } => PipelineState::Rendered,
            Outcome::Fallback { .. } => PipelineState::Fallback,
            Outcome::Errored { .. } => PipelineState::Errored,
        }
    }

    pub fn result(&self) -> TranslationResult {
        match self {
            Outcome::Placeholder => TranslationResult::Translated {
                text: PLACEHOLDER_MESSAGE.to_string(),
            },
            Outcome::Rendered { text, .. } | Outcome::Fallback { text, .. } => {
                TranslationResult::Translated { text: text.clone() }
            }
            Outcome::Errored { message } => TranslationResult::Failed {
                reason: message.clone(),
            },
        }
    }

    /// Text shown in the output surface
    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Placeholder => PLACEHOLDER_MESSAGE,
            Outcome::Rendered { text, .. } | Outcome::Fallback { text, .. } => text,
            Outcome::Errored { message } => message,
        }
    }

    /// Whether the output holds real translated text (worth swapping back or speaking)
    pub fn has_translation(&self) -> bool {
        matches!(self, Outcome::Rendered { .. } | Outcome::Fallback { .. })
    }
}

/// Character counter colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharCountLevel {
    Normal,
    Warning,
    Critical,
}

impl CharCountLevel {
    pub fn for_count(count: usize) -> Self {
        if count > CRITICAL_CHARS {
            CharCountLevel::Critical
        } else if count > WARNING_CHARS {
            CharCountLevel::Warning
        } else {
            CharCountLevel::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Typed,
    Voice,
    Swap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakTarget {
    Input,
    Output,
}

/// Messages into the pipeline event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TextChanged(String),
    SetSource(SourceLanguage),
    SetTarget(LanguageCode),
    Swap,
    VoiceTranscript(String),
    ToggleMic,
    Speak(SpeakTarget),
    DebounceElapsed {
        ticket: u64,
    },
    PhaseChanged {
        generation: u64,
        state: PipelineState,
    },
    TranslationFinished {
        generation: u64,
        outcome: Outcome,
    },
    Shutdown,
}

/// Messages from the pipeline to the view surface
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Input {
        text: String,
        chars: usize,
        level: CharCountLevel,
        source: TextSource,
    },
    Languages {
        source: SourceLanguage,
        target: LanguageCode,
    },
    Loading,
    Output {
        state: PipelineState,
        result: TranslationResult,
    },
    Recording(bool),
    Notice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_text() {
        let request =
            TranslationRequest::new("  hello  ", SourceLanguage::Auto, LanguageCode::Id).unwrap();
        assert_eq!(request.text, "hello");
    }

    #[test]
    fn test_request_rejects_empty() {
        assert_eq!(
            TranslationRequest::new(" \n ", SourceLanguage::Auto, LanguageCode::Id),
            Err(RequestError::Empty)
        );
    }

    #[test]
    fn test_request_rejects_too_long() {
        let text = "a".repeat(MAX_INPUT_CHARS + 1);
        assert!(matches!(
            TranslationRequest::new(&text, SourceLanguage::Auto, LanguageCode::Id),
            Err(RequestError::TooLong { .. })
        ));

        let text = "a".repeat(MAX_INPUT_CHARS);
        assert!(TranslationRequest::new(&text, SourceLanguage::Auto, LanguageCode::Id).is_ok());
    }

    #[test]
    fn test_char_count_levels() {
        assert_eq!(CharCountLevel::for_count(0), CharCountLevel::Normal);
        assert_eq!(CharCountLevel::for_count(4000), CharCountLevel::Normal);
        assert_eq!(CharCountLevel::for_count(4001), CharCountLevel::Warning);
        assert_eq!(CharCountLevel::for_count(4500), CharCountLevel::Warning);
        assert_eq!(CharCountLevel::for_count(4501), CharCountLevel::Critical);
    }

    #[test]
    fn test_outcome_states() {
        let fallback = Outcome::Fallback {
            text: "halo".into(),
            source: LanguageCode::En,
        };
        assert_eq!(fallback.state(), PipelineState::Fallback);
        assert!(fallback.has_translation());

        let errored = Outcome::Errored {
            message: UNAVAILABLE_MESSAGE.into(),
        };
        assert_eq!(errored.state(), PipelineState::Errored);
        assert_eq!(
            errored.result(),
            TranslationResult::Failed {
                reason: UNAVAILABLE_MESSAGE.into()
            }
        );
        assert!(!Outcome::Placeholder.has_translation());
        assert_eq!(Outcome::Placeholder.state(), PipelineState::Rendered);
    }
}
