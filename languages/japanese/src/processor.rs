use nyan_core::KanjiSource;
use nyan_core::preprocess::{Preprocessor, RomajiPreprocessor};

use crate::kana::{KanaError, KanaTable, kana_to_kana};
use crate::kanji::{KanjiEntry, KanjiTable};
use crate::unicode::{KanaType, is_hiragana, is_katakana};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FuriganaError {
    #[error("furigana is empty")]
    Empty,

    #[error("furigana must be hiragana: {0:?}")]
    NotHiragana(String),
}

/// Owned Japanese dictionary service: kana mapping plus kanji table.
///
/// Built once at startup and handed to whoever needs it. The kanji table is
/// immutable; the kana mapping changes only through
/// [`JapaneseDictionary::reload_mapping`].
#[derive(Debug, Clone, Default)]
pub struct JapaneseDictionary {
    kana: KanaTable,
    kanji: KanjiTable,
}

impl JapaneseDictionary {
    pub fn new(kana: KanaTable, kanji: KanjiTable) -> Self {
        Self { kana, kanji }
    }

    /// Replace the active input method wholesale
    pub fn reload_mapping(&mut self, kana: KanaTable) {
        tracing::info!(
            "Switching input method: {} -> {} mappings",
            self.kana.len(),
            kana.len()
        );
        self.kana = kana;
    }

    pub fn kana(&self) -> &KanaTable {
        &self.kana
    }

    pub fn kanji(&self) -> &KanjiTable {
        &self.kanji
    }

    pub fn entry(&self, c: char) -> Option<&KanjiEntry> {
        self.kanji.entry(c)
    }

    /// Transliterate typed input after folding width and case
    pub fn romaji_to_kana(&self, input: &str, keep_unmatched: bool) -> Result<String, KanaError> {
        let input = RomajiPreprocessor.process(input);
        self.kana.romaji_to_kana(&input, keep_unmatched)
    }

    pub fn kana_to_romaji(&self, input: &str) -> String {
        self.kana.kana_to_romaji(input)
    }

    /// True if `candidate` is one of the kanji's readings, either verbatim or
    /// after romaji transliteration. Used to grade sloppy answers.
    pub fn string_matches_any_reading(&self, candidate: &str, kanji: char) -> bool {
        let Some(readings) = self.kanji.readings(kanji) else {
            return false;
        };

        if readings.iter().any(|r| r == candidate) {
            return true;
        }

        match self.romaji_to_kana(candidate, false) {
            Ok(kana) => readings.iter().any(|r| *r == kana),
            Err(e) => {
                tracing::warn!("Cannot transliterate {:?}: {}", candidate, e);
                false
            }
        }
    }

    /// Union of the scripts used in `sentence`.
    pub fn kana_type_flags(&self, sentence: &str) -> KanaType {
        sentence.chars().fold(KanaType::empty(), |flags, c| {
            if self.kanji.is_kanji(c) {
                flags | KanaType::KANJI
            } else if is_hiragana(c) {
                flags | KanaType::HIRAGANA
            } else if is_katakana(c) {
                flags | KanaType::KATAKANA
            } else {
                flags
            }
        })
    }

    /// Validate furigana typed into the editor.
    ///
    /// Pure katakana is converted to hiragana; anything that is not then
    /// entirely hiragana is rejected.
    pub fn normalize_furigana(&self, input: &str) -> Result<String, FuriganaError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FuriganaError::Empty);
        }

        let input = if self.kana_type_flags(input) == KanaType::KATAKANA {
            kana_to_kana(input)
        } else {
            input.to_string()
        };

        if input.chars().all(|c| is_hiragana(c) || c == 'ー') {
            Ok(input)
        } else {
            Err(FuriganaError::NotHiragana(input))
        }
    }
}

impl KanjiSource for JapaneseDictionary {
    fn is_kanji(&self, c: char) -> bool {
        self.kanji.is_kanji(c)
    }

    fn difficulty(&self, c: char) -> i32 {
        self.kanji.difficulty(c)
    }

    fn fingerprint(&self) -> u64 {
        self.kanji.fingerprint()
    }
}
