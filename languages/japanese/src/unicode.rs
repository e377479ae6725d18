//! Character classification for Japanese text.

use bitflags::bitflags;

bitflags! {
    /// Which scripts occur in a string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KanaType: u8 {
        const HIRAGANA = 1;
        const KATAKANA = 2;
        const KANJI = 4;
    }
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c)
}

/// Katakana block plus the prolonged sound mark ー.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30FF}').contains(&c)
}

/// Small kana that palatalise the previous syllable.
pub fn small_y_glide(c: char) -> Option<&'static str> {
    match c {
        'ゃ' | 'ャ' => Some("ya"),
        'ゅ' | 'ュ' => Some("yu"),
        'ょ' | 'ョ' => Some("yo"),
        _ => None,
    }
}

pub fn is_small_tsu(c: char) -> bool {
    c == 'っ' || c == 'ッ'
}

pub fn is_romaji_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(is_katakana('ー'));
        assert!(!is_katakana('あ'));
    }

    #[test]
    fn glides() {
        assert_eq!(small_y_glide('ゃ'), Some("ya"));
        assert_eq!(small_y_glide('ョ'), Some("yo"));
        assert_eq!(small_y_glide('や'), None);
    }
}
