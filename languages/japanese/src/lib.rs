pub mod jlpt;
pub mod kana;
pub mod kanji;
pub mod loader;
pub mod processor;
pub mod unicode;

pub use jlpt::JlptLevel;
pub use kana::{KanaEntry, KanaError, KanaTable, kana_to_kana};
pub use kanji::{KanjiEntry, KanjiTable};
pub use loader::KanjiDictionaryLoader;
pub use processor::{FuriganaError, JapaneseDictionary};
pub use unicode::KanaType;
