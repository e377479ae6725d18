use nyan_core::KanjiSource;

use crate::model::Level;

/// Outcome of checking a decoded level for playability.
///
/// A non-success result never discards the level: the editor still opens it,
/// the level listing shows a warning and refuses to start play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ParserResult {
    #[default]
    Success = 0,
    SentenceTooLong = 1,
    FuriganaMismatch = 2,
    NoPages = 3,
    NoSentences = 4,
}

impl ParserResult {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ParserResult::Success),
            1 => Some(ParserResult::SentenceTooLong),
            2 => Some(ParserResult::FuriganaMismatch),
            3 => Some(ParserResult::NoPages),
            4 => Some(ParserResult::NoSentences),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == ParserResult::Success
    }

    pub fn message(self) -> &'static str {
        match self {
            ParserResult::Success => "OK",
            ParserResult::SentenceTooLong => "A sentence is too long to display",
            ParserResult::FuriganaMismatch => "Furigana do not match the kanji in a sentence",
            ParserResult::NoPages => "Level has no pages",
            ParserResult::NoSentences => "Level has no sentences",
        }
    }
}

/// Check a level; the first failing sentence in page order decides the result.
pub fn parse_level(level: &Level, kanji: &impl KanjiSource, max_sentence_length: usize) -> ParserResult {
    if level.pages.is_empty() {
        return ParserResult::NoPages;
    }

    let mut sentences = 0;
    for (page_idx, page) in level.pages.iter().enumerate() {
        for (idx, sentence) in page.sentences.iter().enumerate() {
            sentences += 1;

            if sentence.char_count() > max_sentence_length {
                tracing::warn!(
                    "{}: sentence {} on page {} has {} characters (max {})",
                    level.file_name,
                    idx,
                    page_idx,
                    sentence.char_count(),
                    max_sentence_length
                );
                return ParserResult::SentenceTooLong;
            }

            if !sentence.furigana_consistent(kanji) {
                tracing::warn!(
                    "{}: sentence {} on page {} has {} furigana for {} kanji",
                    level.file_name,
                    idx,
                    page_idx,
                    sentence.furigana.len(),
                    kanji.count_kanji(&sentence.text)
                );
                return ParserResult::FuriganaMismatch;
            }
        }
    }

    if sentences == 0 {
        return ParserResult::NoSentences;
    }

    ParserResult::Success
}
