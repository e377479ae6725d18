/// Kanji knowledge needed by code that only analyses text.
///
/// Level validation, statistics and the editor's furigana bookkeeping take
/// this instead of a concrete dictionary so they stay independent of how the
/// dictionary is loaded.
pub trait KanjiSource {
    /// True iff `c` is a known kanji.
    fn is_kanji(&self, c: char) -> bool;

    /// Difficulty score of a known kanji.
    ///
    /// Callers check [`KanjiSource::is_kanji`] first; implementations may
    /// panic for unknown characters.
    fn difficulty(&self, c: char) -> i32;

    /// Identifies the dictionary contents; changes whenever the known kanji or
    /// their difficulties change. Sources without one report 0.
    fn fingerprint(&self) -> u64 {
        0
    }

    /// Number of kanji in `text`.
    fn count_kanji(&self, text: &str) -> usize {
        text.chars().filter(|c| self.is_kanji(*c)).count()
    }
}

impl<T: KanjiSource + ?Sized> KanjiSource for &T {
    fn is_kanji(&self, c: char) -> bool {
        (**self).is_kanji(c)
    }

    fn difficulty(&self, c: char) -> i32 {
        (**self).difficulty(c)
    }

    fn fingerprint(&self) -> u64 {
        (**self).fingerprint()
    }
}

impl<T: KanjiSource + ?Sized> KanjiSource for std::sync::Arc<T> {
    fn is_kanji(&self, c: char) -> bool {
        (**self).is_kanji(c)
    }

    fn difficulty(&self, c: char) -> i32 {
        (**self).difficulty(c)
    }

    fn fingerprint(&self) -> u64 {
        (**self).fingerprint()
    }
}
