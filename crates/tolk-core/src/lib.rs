pub mod detect;
pub mod language;
pub mod phrasebook;
pub mod preprocess;
pub mod types;

pub use detect::HeuristicLanguageDetector;
pub use language::{LanguageCode, LanguageError, SourceLanguage};
pub use phrasebook::Phrasebook;
