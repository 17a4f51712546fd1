//! Best-effort language guessing used when remote detection is unavailable.
//!
//! Latin-script languages are scored by counting common function words,
//! the remaining ones by counting characters of their Unicode block. The
//! highest score wins; on a tie the language scanned first keeps the lead.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use crate::language::LanguageCode;

enum Rule {
    Keywords(Regex),
    Script(&'static [RangeInclusive<char>]),
}

impl Rule {
    fn keywords(words: &[&str]) -> Self {
        let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
        // Built from the static word lists below, never from user input
        Rule::Keywords(Regex::new(&pattern).expect("keyword pattern must compile"))
    }

    fn score(&self, text: &str) -> usize {
        match self {
            Rule::Keywords(re) => re.find_iter(text).count(),
            Rule::Script(ranges) => text
                .chars()
                .filter(|c| ranges.iter().any(|r| r.contains(c)))
                .count(),
        }
    }
}

/// Scan order matters: it decides ties
static RULES: LazyLock<Vec<(LanguageCode, Rule)>> = LazyLock::new(|| {
    vec![
        (
            LanguageCode::Id,
            Rule::keywords(&[
                "dan", "atau", "yang", "ini", "itu", "dengan", "untuk", "dari", "ke", "di", "pada",
                "akan", "adalah", "tidak", "ada", "saya", "kami", "mereka", "dia", "kamu", "anda",
            ]),
        ),
        (
            LanguageCode::En,
            Rule::keywords(&[
                "the", "and", "or", "that", "this", "with", "for", "from", "to", "in", "on",
                "will", "is", "are", "not", "have", "has", "you", "we", "they", "he", "she", "it",
            ]),
        ),
        (
            LanguageCode::Es,
            Rule::keywords(&[
                "el", "la", "y", "o", "que", "con", "para", "de", "a", "en", "es", "no", "tiene",
                "usted", "nosotros", "ellos", "él", "ella",
            ]),
        ),
        (
            LanguageCode::Fr,
            Rule::keywords(&[
                "le", "la", "et", "ou", "que", "avec", "pour", "de", "à", "dans", "sur", "est",
                "ne", "pas", "avoir", "vous", "nous", "ils", "il", "elle",
            ]),
        ),
        (
            LanguageCode::De,
            Rule::keywords(&[
                "der", "die", "das", "und", "oder", "dass", "mit", "für", "von", "zu", "in", "auf",
                "ist", "nicht", "haben", "sie", "wir", "er", "es",
            ]),
        ),
        (
            LanguageCode::Ja,
            Rule::Script(&['\u{3040}'..='\u{309F}', '\u{30A0}'..='\u{30FF}']),
        ),
        (LanguageCode::Zh, Rule::Script(&['\u{4E00}'..='\u{9FFF}'])),
        (LanguageCode::Ar, Rule::Script(&['\u{0600}'..='\u{06FF}'])),
        (LanguageCode::Ru, Rule::Script(&['\u{0400}'..='\u{04FF}'])),
    ]
});

/// Checked by plain substring when no rule scored at all
const INDONESIAN_HINTS: &[&str] = &[
    "saya", "anda", "dia", "kita", "mereka", "ini", "itu", "dengan", "untuk", "dari", "ke", "di",
    "pada", "yang", "adalah", "akan", "sudah", "belum", "tidak", "ada",
];

pub const DEFAULT_LANGUAGE: LanguageCode = LanguageCode::En;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicLanguageDetector;

impl HeuristicLanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Guess the language of `text`. Never fails, falls back to English.
    pub fn detect(&self, text: &str) -> LanguageCode {
        let (best, max_score) = self.scores(text).into_iter().fold(
            (DEFAULT_LANGUAGE, 0),
            |(best, max), (lang, score)| {
                if score > max {
                    (lang, score)
                } else {
                    (best, max)
                }
            },
        );

        if max_score == 0 && contains_indonesian_hint(text) {
            return LanguageCode::Id;
        }

        best
    }

    /// Per-language match counts, in scan order
    pub fn scores(&self, text: &str) -> Vec<(LanguageCode, usize)> {
        RULES
            .iter()
            .map(|(lang, rule)| (*lang, rule.score(text)))
            .collect()
    }
}

fn contains_indonesian_hint(text: &str) -> bool {
    let lower = text.to_lowercase();
    INDONESIAN_HINTS.iter().any(|word| lower.contains(word))
}
