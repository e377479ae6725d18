use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default romaji preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // NFKC folds full-width Latin typed through an IME back to ASCII
        let text: String = text.nfkc().collect();

        text.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

pub struct RomajiPreprocessor;
impl Preprocessor for RomajiPreprocessor {}
