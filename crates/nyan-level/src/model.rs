use nyan_core::KanjiSource;

use crate::flags::{Alignment, SentenceFlags};

/// How the level's native resolution maps onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ScaleMode {
    #[default]
    Keep = 0,
    AspectUp = 1,
    Aspect = 2,
    ScaleUp = 3,
    Scale = 4,
}

impl ScaleMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ScaleMode::Keep),
            1 => Some(ScaleMode::AspectUp),
            2 => Some(ScaleMode::Aspect),
            3 => Some(ScaleMode::ScaleUp),
            4 => Some(ScaleMode::Scale),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Rectangle in level-native coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A block of text placed on a page, with one furigana per kanji.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceObject {
    pub rect: Rect,
    pub text: String,
    pub text_size: f32,
    pub outline_size: f32,
    pub alignment: Alignment,
    pub bold: bool,
    pub vertical: bool,
    /// `true`: black text with white outline; `false`: white with black outline.
    pub color: bool,
    /// Positional: entry `i` annotates the `i`-th kanji of `text`.
    pub furigana: Vec<String>,
}

impl SentenceObject {
    pub const DEFAULT_TEXT_SIZE: f32 = 36.0;
    pub const DEFAULT_OUTLINE_SIZE: f32 = 0.2;

    /// Empty sentence with editor defaults.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            text: String::new(),
            text_size: Self::DEFAULT_TEXT_SIZE,
            outline_size: Self::DEFAULT_OUTLINE_SIZE,
            alignment: Alignment::TOP_LEFT,
            bold: false,
            vertical: false,
            color: true,
            furigana: Vec::new(),
        }
    }

    pub fn flags(&self) -> SentenceFlags {
        SentenceFlags {
            alignment: self.alignment,
            bold: self.bold,
            vertical: self.vertical,
            color: self.color,
        }
    }

    pub fn set_flags(&mut self, flags: SentenceFlags) {
        self.alignment = flags.alignment;
        self.bold = flags.bold;
        self.vertical = flags.vertical;
        self.color = flags.color;
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the furigana list has one entry per kanji.
    pub fn furigana_consistent(&self, kanji: &impl KanjiSource) -> bool {
        self.furigana.len() == kanji.count_kanji(&self.text)
    }

    /// Furigana for `new_text` derived from the current ones.
    ///
    /// Same kanji count: copied by position. Otherwise: one empty string per kanji.
    pub fn furigana_for_text(&self, new_text: &str, kanji: &impl KanjiSource) -> Vec<String> {
        let count = kanji.count_kanji(new_text);
        if count == kanji.count_kanji(&self.text) && count == self.furigana.len() {
            self.furigana.clone()
        } else {
            vec![String::new(); count]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Encoded image bytes as stored; decoding is the renderer's business.
    pub background: Option<Vec<u8>>,
    pub background_scale_mode: u8,
    pub sentences: Vec<SentenceObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// File name on disk; not part of the encoded data.
    pub file_name: String,
    pub name: String,
    pub author: String,
    pub native_width: i32,
    pub native_height: i32,
    pub scale_mode: ScaleMode,
    pub input_offset: (i32, i32),
    pub pages: Vec<Page>,
}

impl Level {
    pub fn new(name: impl Into<String>, author: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            file_name: String::new(),
            name: name.into(),
            author: author.into(),
            native_width: width,
            native_height: height,
            scale_mode: ScaleMode::default(),
            input_offset: (0, 0),
            pages: vec![Page::default()],
        }
    }

    pub fn sentences(&self) -> impl Iterator<Item = &SentenceObject> {
        self.pages.iter().flat_map(|p| p.sentences.iter())
    }

    pub fn sentence(&self, page: usize, sentence: usize) -> Option<&SentenceObject> {
        self.pages.get(page)?.sentences.get(sentence)
    }

    pub fn sentence_mut(&mut self, page: usize, sentence: usize) -> Option<&mut SentenceObject> {
        self.pages.get_mut(page)?.sentences.get_mut(sentence)
    }
}
