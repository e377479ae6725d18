
use nyan_config::Config;
use nyan_lang_japanese::{JlptLevel, KanjiEntry, KanjiTable};
use nyan_level::{Level, Rect, SentenceObject};
use tempfile::TempDir;

use crate::ensure_directories;

pub(crate) fn kanji() -> KanjiTable {
    let mut table = KanjiTable::new();
    for (character, jlpt, rank, reading) in [('猫', JlptLevel::N3, 1702, "ねこ"), ('犬', JlptLevel::N4, 1326, "いぬ")] {
        table.push(KanjiEntry {
            character,
            frequency_rank: rank,
            jlpt,
            readings: vec![reading.to_string()],
        });
    }
    table
}

fn level(text: &str, furigana: &[&str]) -> Level {
    let mut level = Level::new(text, "tests", 1280, 720);
    let mut sentence = SentenceObject::new(Rect::new(0.0, 0.0, 400.0, 80.0));
    sentence.text = text.to_string();
    sentence.furigana = furigana.iter().map(|f| f.to_string()).collect();
    level.pages[0].sentences.push(sentence);
    level
}

/// A data directory with three levels (one unreadable), two input methods
/// (one empty) and a kanji dictionary.
pub(crate) fn data_dir() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new();
    config.paths.root = dir.path().to_path_buf();
    ensure_directories(&config).unwrap();

    let levels = config.paths.levels();
    level("猫と犬", &["ねこ", "いぬ"]).save(&levels.join("good.nyl")).unwrap();
    level("ねこがたくさんいます", &[]).save(&levels.join("long.nyl")).unwrap();
    std::fs::write(levels.join("broken.nyl"), b"\x05NYLv9").unwrap();
    std::fs::write(levels.join("notes.txt"), b"not a level").unwrap();

    let methods = config.paths.input_methods();
    std::fs::write(methods.join("hepburn.cfg"), "# hepburn\nね=ne\nこ=ko\nい=i\nぬ=nu\n").unwrap();
    std::fs::write(methods.join("empty.cfg"), "# nothing here\n").unwrap();

    let mut bytes = Vec::new();
    kanji().write_to(&mut bytes).unwrap();
    std::fs::write(config.paths.kanji_dictionary(), bytes).unwrap();

    (dir, config)
}
