//! `.nyl.meta` summary files.
//!
//! A meta is a cache: whenever it is missing, unreadable, of another format
//! version, older than its level or computed under a different sentence limit
//! or kanji dictionary, it is rebuilt from the level and rewritten.

use std::fs::Metadata;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use nyan_core::binary::{ReadBinaryExt, WriteBinaryExt};
use nyan_core::fs::atomic_write;
use nyan_core::{DecodeError, FormatError, KanjiSource};

use crate::model::Level;
use crate::stats::derive_stats;
use crate::validate::{ParserResult, parse_level};

pub const META_TAG: &[u8; 4] = b"NYLM";
pub const META_VERSION: u16 = 4;

/// Identifies the exact level file a meta was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceStamp {
    pub length: u64,
    /// Modification time in seconds since the epoch, 0 when unavailable.
    pub modified: u64,
}

impl SourceStamp {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            length: metadata.len(),
            modified,
        }
    }

    pub fn of(path: &Path) -> io::Result<Self> {
        Ok(Self::from_metadata(&std::fs::metadata(path)?))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMeta {
    pub source: SourceStamp,
    /// Sentence limit `parser_result` was computed with.
    pub max_sentence_length: usize,
    /// [`KanjiSource::fingerprint`] of the dictionary behind the kanji stats.
    pub dictionary: u64,
    pub parser_result: ParserResult,
    pub level_name: String,
    pub author: String,
    pub page_count: usize,
    pub difficulty: f32,
    pub kanji_count: usize,
    pub character_count: usize,
    pub longest_sentence: usize,
    pub most_kanji_in_sentence: usize,
    /// First page background, as stored in the level.
    pub thumbnail: Option<Vec<u8>>,
}

impl LevelMeta {
    /// Summarise a decoded level.
    pub fn generate(
        level: &Level,
        source: SourceStamp,
        kanji: &impl KanjiSource,
        max_sentence_length: usize,
    ) -> Self {
        let stats = derive_stats(level, kanji);
        Self {
            source,
            max_sentence_length,
            dictionary: kanji.fingerprint(),
            parser_result: parse_level(level, kanji, max_sentence_length),
            level_name: level.name.clone(),
            author: level.author.clone(),
            page_count: level.pages.len(),
            difficulty: stats.difficulty,
            kanji_count: stats.kanji_count,
            character_count: stats.character_count,
            longest_sentence: stats.longest_sentence,
            most_kanji_in_sentence: stats.most_kanji_in_sentence,
            thumbnail: level.pages.first().and_then(|p| p.background.clone()),
        }
    }

    /// Whether the level listing may start this level.
    pub fn is_playable(&self) -> bool {
        self.parser_result.is_success()
    }

    /// Whether this meta still describes `source` under the given dictionary
    /// and sentence limit.
    pub fn is_current(&self, source: SourceStamp, kanji: &impl KanjiSource, max_sentence_length: usize) -> bool {
        self.source == source
            && self.max_sentence_length == max_sentence_length
            && self.dictionary == kanji.fingerprint()
    }

    /// `Levels/foo.nyl` -> `Levels/foo.nyl.meta`
    pub fn path_for(level_path: &Path) -> PathBuf {
        let mut name = level_path.as_os_str().to_owned();
        name.push(".meta");
        PathBuf::from(name)
    }

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(META_TAG)?;
        w.write_u16_le(META_VERSION)?;
        w.write_u64_le(self.source.length)?;
        w.write_u64_le(self.source.modified)?;
        w.write_count(self.max_sentence_length)?;
        w.write_u64_le(self.dictionary)?;
        w.write_i32_le(self.parser_result.code())?;
        w.write_string(&self.level_name)?;
        w.write_string(&self.author)?;
        w.write_count(self.page_count)?;
        w.write_f32_le(self.difficulty)?;
        w.write_count(self.kanji_count)?;
        w.write_count(self.character_count)?;
        w.write_count(self.longest_sentence)?;
        w.write_count(self.most_kanji_in_sentence)?;
        match self.thumbnail.as_deref() {
            Some(data) => {
                w.write_count(data.len())?;
                w.write_all(data)?;
            }
            None => w.write_i32_le(0)?,
        }
        Ok(())
    }

    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        r.expect_tag(META_TAG)?;
        let version = r.read_u16_le()?;
        if version != META_VERSION {
            return Err(DecodeError::VersionMismatch {
                expected: META_VERSION.to_string(),
                found: version.to_string(),
            });
        }

        let source = SourceStamp {
            length: r.read_u64_le()?,
            modified: r.read_u64_le()?,
        };
        let max_sentence_length = r.read_count("max sentence length")?;
        let dictionary = r.read_u64_le()?;
        let code = r.read_i32_le()?;
        let parser_result = ParserResult::from_code(code)
            .ok_or_else(|| DecodeError::Invalid(format!("unknown parser result {code}")))?;
        let level_name = r.read_string()?;
        let author = r.read_string()?;
        let page_count = r.read_count("page count")?;
        let difficulty = r.read_f32_le()?;
        let kanji_count = r.read_count("kanji count")?;
        let character_count = r.read_count("character count")?;
        let longest_sentence = r.read_count("longest sentence")?;
        let most_kanji_in_sentence = r.read_count("kanji per sentence")?;
        let thumbnail_len = r.read_count("thumbnail length")?;
        let thumbnail = if thumbnail_len == 0 {
            None
        } else {
            Some(r.read_bytes(thumbnail_len)?)
        };

        Ok(Self {
            source,
            max_sentence_length,
            dictionary,
            parser_result,
            level_name,
            author,
            page_count,
            difficulty,
            kanji_count,
            character_count,
            longest_sentence,
            most_kanji_in_sentence,
            thumbnail,
        })
    }

    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path).map_err(|e| FormatError::from_io(path, e))?;
        Self::read_from(&mut Cursor::new(bytes)).map_err(|e| FormatError::decode(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        atomic_write(path, |w| self.write_to(w)).map_err(|e| FormatError::write(path, e))
    }

    /// Return the cached meta for `level_path`, rebuilding it when stale.
    ///
    /// Only a level that cannot be read is an error; a meta that cannot be
    /// written is logged and the fresh summary is still returned.
    pub fn load_or_regenerate(
        level_path: &Path,
        kanji: &impl KanjiSource,
        max_sentence_length: usize,
    ) -> Result<Self, FormatError> {
        let source = SourceStamp::of(level_path).map_err(|e| FormatError::from_io(level_path, e))?;
        let meta_path = Self::path_for(level_path);

        match Self::load(&meta_path) {
            Ok(meta) if meta.is_current(source, kanji, max_sentence_length) => return Ok(meta),
            Ok(_) => tracing::info!("{} is stale, regenerating", meta_path.display()),
            Err(e) if e.is_missing() => tracing::debug!("No meta for {}", level_path.display()),
            Err(e) => tracing::warn!("Regenerating unreadable meta: {}", e),
        }

        let level = Level::load(level_path)?;
        let meta = Self::generate(&level, source, kanji, max_sentence_length);
        if let Err(e) = meta.save(&meta_path) {
            tracing::warn!("Could not cache level meta: {}", e);
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::Ideographs;
    use crate::model::{Rect, SentenceObject};

    fn level() -> Level {
        let mut level = Level::new("試験", "nyan", 800, 600);
        let mut s = SentenceObject::new(Rect::default());
        s.text = "日本です".into();
        s.furigana = vec!["に".into(), "ほん".into()];
        level.pages[0].sentences.push(s);
        level.pages[0].background = Some(vec![1, 2, 3]);
        level
    }

    #[test]
    fn generated_from_level() {
        let meta = LevelMeta::generate(&level(), SourceStamp::default(), &Ideographs, 60);
        assert!(meta.is_playable());
        assert_eq!(meta.kanji_count, 2);
        assert_eq!(meta.character_count, 4);
        assert_eq!(meta.thumbnail.as_deref(), Some(&[1u8, 2, 3][..]));

        let failing = LevelMeta::generate(&level(), SourceStamp::default(), &Ideographs, 3);
        assert_eq!(failing.parser_result, ParserResult::SentenceTooLong);
        assert!(!failing.is_playable());
    }

    #[test]
    fn encodes_and_decodes() {
        let meta = LevelMeta::generate(
            &level(),
            SourceStamp {
                length: 99,
                modified: 1_700_000_000,
            },
            &Ideographs,
            60,
        );
        let mut bytes = Vec::new();
        meta.write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[..6], b"NYLM\x04\x00");
        assert_eq!(LevelMeta::read_from(&mut Cursor::new(bytes)).unwrap(), meta);
    }

    #[test]
    fn old_version_is_rejected() {
        let mut bytes = Vec::new();
        LevelMeta::default().write_to(&mut bytes).unwrap();
        bytes[4] = 3;
        let err = LevelMeta::read_from(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, DecodeError::VersionMismatch { .. }));
    }

    #[test]
    fn meta_path_appends_suffix() {
        assert_eq!(
            LevelMeta::path_for(Path::new("Levels/intro.nyl")),
            PathBuf::from("Levels/intro.nyl.meta")
        );
    }

    #[test]
    fn regenerates_when_missing_corrupt_or_stale() {
        let dir = tempfile::tempdir().unwrap();
        let level_path = dir.path().join("intro.nyl");
        let meta_path = LevelMeta::path_for(&level_path);
        level().save(&level_path).unwrap();

        let meta = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap();
        assert_eq!(meta.level_name, "試験");
        assert!(meta_path.exists());
        assert_eq!(LevelMeta::load(&meta_path).unwrap(), meta);

        std::fs::write(&meta_path, b"garbage").unwrap();
        let again = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap();
        assert_eq!(again, meta);
        assert_eq!(LevelMeta::load(&meta_path).unwrap(), meta);

        let mut changed = level();
        changed.name = "改訂版の試験".into();
        changed.save(&level_path).unwrap();
        let fresh = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap();
        assert_eq!(fresh.level_name, "改訂版の試験");
    }

    #[test]
    fn regenerates_when_sentence_limit_changes() {
        let dir = tempfile::tempdir().unwrap();
        let level_path = dir.path().join("long.nyl");
        let mut level = level();
        level.pages[0].sentences[0].text = "日本語の長い文章です".into();
        level.pages[0].sentences[0].furigana = ["に", "ほん", "ご", "なが", "ぶん", "しょう"]
            .map(String::from)
            .to_vec();
        level.save(&level_path).unwrap();

        let relaxed = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap();
        assert!(relaxed.is_playable());

        let strict = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 5).unwrap();
        assert_eq!(strict.parser_result, ParserResult::SentenceTooLong);
        assert_eq!(LevelMeta::load(&LevelMeta::path_for(&level_path)).unwrap(), strict);
    }

    struct Reranked;

    impl KanjiSource for Reranked {
        fn is_kanji(&self, c: char) -> bool {
            Ideographs.is_kanji(c)
        }

        fn difficulty(&self, _: char) -> i32 {
            20
        }

        fn fingerprint(&self) -> u64 {
            7
        }
    }

    #[test]
    fn regenerates_when_dictionary_changes() {
        let dir = tempfile::tempdir().unwrap();
        let level_path = dir.path().join("intro.nyl");
        level().save(&level_path).unwrap();

        let before = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap();
        let after = LevelMeta::load_or_regenerate(&level_path, &Reranked, 60).unwrap();
        assert_eq!(after.dictionary, 7);
        assert_eq!(after.difficulty, 20.0);
        assert_ne!(after.difficulty, before.difficulty);
    }

    #[test]
    fn unreadable_level_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let level_path = dir.path().join("broken.nyl");
        std::fs::write(&level_path, b"\x05NYLv9").unwrap();
        let err = LevelMeta::load_or_regenerate(&level_path, &Ideographs, 60).unwrap_err();
        assert_eq!(err.file(), "broken.nyl");
    }
}
