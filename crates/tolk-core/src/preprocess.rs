use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Trim, NFKC-normalize and collapse whitespace runs to a single space
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        let text: String = text.nfkc().collect();

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
