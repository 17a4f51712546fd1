use std::collections::HashMap;
use std::sync::LazyLock;

use crate::language::LanguageCode;
use crate::preprocess::{DefaultPreprocessor, Preprocessor};

type Key = (LanguageCode, LanguageCode, String);

/// (from, to, phrase, translation)
const ENTRIES: &[(LanguageCode, LanguageCode, &str, &str)] = {
    use LanguageCode::{De, En, Es, Fr, Id};
    &[
        (En, Id, "hello", "halo"),
        (En, Id, "good morning", "selamat pagi"),
        (En, Id, "good afternoon", "selamat siang"),
        (En, Id, "good evening", "selamat malam"),
        (En, Id, "thank you", "terima kasih"),
        (En, Id, "how are you", "apa kabar"),
        (En, Id, "yes", "ya"),
        (En, Id, "no", "tidak"),
        (En, Id, "please", "tolong"),
        (En, Id, "sorry", "maaf"),
        (En, Id, "goodbye", "selamat tinggal"),
        (Id, En, "halo", "hello"),
        (Id, En, "selamat pagi", "good morning"),
        (Id, En, "selamat siang", "good afternoon"),
        (Id, En, "selamat malam", "good evening"),
        (Id, En, "terima kasih", "thank you"),
        (Id, En, "apa kabar", "how are you"),
        (Id, En, "ya", "yes"),
        (Id, En, "tidak", "no"),
        (Id, En, "tolong", "please"),
        (Id, En, "maaf", "sorry"),
        (Id, En, "selamat tinggal", "goodbye"),
        (En, Es, "hello", "hola"),
        (En, Es, "thank you", "gracias"),
        (En, Es, "good morning", "buenos días"),
        (En, Es, "goodbye", "adiós"),
        (Es, En, "hola", "hello"),
        (Es, En, "gracias", "thank you"),
        (Es, En, "buenos días", "good morning"),
        (Es, En, "adiós", "goodbye"),
        (En, Fr, "hello", "bonjour"),
        (En, Fr, "thank you", "merci"),
        (En, Fr, "goodbye", "au revoir"),
        (Fr, En, "bonjour", "hello"),
        (Fr, En, "merci", "thank you"),
        (Fr, En, "au revoir", "goodbye"),
        (En, De, "hello", "hallo"),
        (En, De, "thank you", "danke"),
        (En, De, "good morning", "guten Morgen"),
        (En, De, "goodbye", "auf Wiedersehen"),
        (De, En, "hallo", "hello"),
        (De, En, "danke", "thank you"),
        (De, En, "guten morgen", "good morning"),
        (De, En, "auf wiedersehen", "goodbye"),
    ]
};

static BUILTIN: LazyLock<Phrasebook> = LazyLock::new(|| Phrasebook::from_entries(ENTRIES));

/// Offline phrase table consulted when the translation service fails.
///
/// Matching is exact on the whole input after trimming, NFKC normalization
/// and lowercasing. No partial matches.
#[derive(Debug, Clone, Default)]
pub struct Phrasebook {
    entries: HashMap<Key, &'static str>,
}

impl Phrasebook {
    /// Shared table shipped with the crate
    pub fn builtin() -> &'static Phrasebook {
        &BUILTIN
    }

    pub fn from_entries(entries: &[(LanguageCode, LanguageCode, &str, &'static str)]) -> Self {
        let entries = entries
            .iter()
            .map(|(from, to, phrase, translation)| ((*from, *to, normalize(phrase)), *translation))
            .collect();

        Self { entries }
    }

    pub fn lookup(&self, from: LanguageCode, to: LanguageCode, text: &str) -> Option<&'static str> {
        self.entries.get(&(from, to, normalize(text))).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    DefaultPreprocessor.process(text).to_lowercase()
}
