use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the translator can be pointed at.
///
/// Declaration order is the order shown in language selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageCode {
    En,
    Id,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ru,
    Ja,
    Ko,
    Zh,
    Ar,
    Hi,
    Th,
    Vi,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 15] = [
        LanguageCode::En,
        LanguageCode::Id,
        LanguageCode::Es,
        LanguageCode::Fr,
        LanguageCode::De,
        LanguageCode::It,
        LanguageCode::Pt,
        LanguageCode::Ru,
        LanguageCode::Ja,
        LanguageCode::Ko,
        LanguageCode::Zh,
        LanguageCode::Ar,
        LanguageCode::Hi,
        LanguageCode::Th,
        LanguageCode::Vi,
    ];

    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Id => "id",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Pt => "pt",
            LanguageCode::Ru => "ru",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
            LanguageCode::Zh => "zh",
            LanguageCode::Ar => "ar",
            LanguageCode::Hi => "hi",
            LanguageCode::Th => "th",
            LanguageCode::Vi => "vi",
        }
    }

    /// BCP 47 locale handed to speech recognition and synthesis
    pub fn speech_locale(self) -> &'static str {
        match self {
            LanguageCode::En => "en-US",
            LanguageCode::Id => "id-ID",
            LanguageCode::Es => "es-ES",
            LanguageCode::Fr => "fr-FR",
            LanguageCode::De => "de-DE",
            LanguageCode::It => "it-IT",
            LanguageCode::Pt => "pt-BR",
            LanguageCode::Ru => "ru-RU",
            LanguageCode::Ja => "ja-JP",
            LanguageCode::Ko => "ko-KR",
            LanguageCode::Zh => "zh-CN",
            LanguageCode::Ar => "ar-SA",
            LanguageCode::Hi => "hi-IN",
            LanguageCode::Th => "th-TH",
            LanguageCode::Vi => "vi-VN",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Id => "Indonesian",
            LanguageCode::Es => "Spanish",
            LanguageCode::Fr => "French",
            LanguageCode::De => "German",
            LanguageCode::It => "Italian",
            LanguageCode::Pt => "Portuguese",
            LanguageCode::Ru => "Russian",
            LanguageCode::Ja => "Japanese",
            LanguageCode::Ko => "Korean",
            LanguageCode::Zh => "Chinese",
            LanguageCode::Ar => "Arabic",
            LanguageCode::Hi => "Hindi",
            LanguageCode::Th => "Thai",
            LanguageCode::Vi => "Vietnamese",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Strip region/script subtags: `en-US` -> `en`, `zh_Hans` -> `zh`
pub fn normalize_locale(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_locale(s);
        if normalized == AUTO {
            return Err(LanguageError::AutoAsTarget);
        }

        LanguageCode::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| LanguageError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.code().to_string()
    }
}

const AUTO: &str = "auto";

/// Source side of a request. Only the source may be left to detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceLanguage {
    #[default]
    Auto,
    Fixed(LanguageCode),
}

impl SourceLanguage {
    pub fn is_auto(self) -> bool {
        matches!(self, SourceLanguage::Auto)
    }

    pub fn fixed(self) -> Option<LanguageCode> {
        match self {
            SourceLanguage::Auto => None,
            SourceLanguage::Fixed(code) => Some(code),
        }
    }

    /// Locale used for one-shot speech capture. Auto-detect listens in en-US.
    pub fn speech_locale(self) -> &'static str {
        self.fixed()
            .map(LanguageCode::speech_locale)
            .unwrap_or(LanguageCode::En.speech_locale())
    }
}

impl From<LanguageCode> for SourceLanguage {
    fn from(value: LanguageCode) -> Self {
        SourceLanguage::Fixed(value)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Auto => f.write_str(AUTO),
            SourceLanguage::Fixed(code) => code.fmt(f),
        }
    }
}

impl FromStr for SourceLanguage {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_locale(s) == AUTO {
            Ok(SourceLanguage::Auto)
        } else {
            s.parse().map(SourceLanguage::Fixed)
        }
    }
}

impl TryFrom<String> for SourceLanguage {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceLanguage> for String {
    fn from(value: SourceLanguage) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    #[error("Unknown language code: {0}")]
    Unknown(String),

    #[error("\"auto\" is only valid as a source language")]
    AutoAsTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_codes() {
        assert_eq!("id".parse::<LanguageCode>(), Ok(LanguageCode::Id));
        assert_eq!("JA".parse::<LanguageCode>(), Ok(LanguageCode::Ja));
    }

    #[test]
    fn test_parse_strips_region() {
        assert_eq!("en-US".parse::<LanguageCode>(), Ok(LanguageCode::En));
        assert_eq!("zh-CN".parse::<LanguageCode>(), Ok(LanguageCode::Zh));
        assert_eq!("pt_BR".parse::<LanguageCode>(), Ok(LanguageCode::Pt));
    }

    #[test]
    fn test_auto_rejected_as_target() {
        assert_eq!(
            "auto".parse::<LanguageCode>(),
            Err(LanguageError::AutoAsTarget)
        );
        assert_eq!("auto".parse::<SourceLanguage>(), Ok(SourceLanguage::Auto));
    }

    #[test]
    fn test_unknown_code() {
        assert!(matches!(
            "xx".parse::<LanguageCode>(),
            Err(LanguageError::Unknown(_))
        ));
    }

    #[test]
    fn test_speech_locale() {
        assert_eq!(LanguageCode::Pt.speech_locale(), "pt-BR");
        assert_eq!(SourceLanguage::Auto.speech_locale(), "en-US");
        assert_eq!(SourceLanguage::Fixed(LanguageCode::Id).speech_locale(), "id-ID");
    }

    #[test]
    fn test_serde_as_plain_strings() {
        let json = serde_json::to_string(&SourceLanguage::Auto).unwrap();
        assert_eq!(json, "\"auto\"");
        let code: LanguageCode = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(code, LanguageCode::Ko);
        assert!(serde_json::from_str::<LanguageCode>("\"auto\"").is_err());
    }
}
