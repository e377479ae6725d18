use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};

use nyan_core::DecodeError;
use nyan_core::KanjiSource;
use nyan_core::binary::{ReadBinaryExt, WriteBinaryExt};

use crate::jlpt::JlptLevel;

/// Frequency ranks per difficulty step.
const RANK_BUCKET: i32 = 2500;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A kanji with its frequency rank, JLPT level and accepted readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanjiEntry {
    pub character: char,
    pub frequency_rank: i32,
    pub jlpt: JlptLevel,
    pub readings: Vec<String>,
}

impl KanjiEntry {
    /// Coarse difficulty score: `rank / 2500 * 4 + (6 - jlpt)` with integer division.
    pub fn difficulty(&self) -> i32 {
        self.frequency_rank / RANK_BUCKET * 4 + (6 - self.jlpt.number())
    }

    /// Decode one dictionary record: character, jlpt, rank, readings.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeError> {
        let text = reader.read_string()?;
        let mut chars = text.chars();
        let character = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(DecodeError::Invalid(format!("not a single character: {text:?}"))),
        };

        let jlpt_number = reader.read_i32_le()?;
        let jlpt = JlptLevel::from_number(jlpt_number).unwrap_or_else(|| {
            tracing::warn!("Kanji {} has JLPT level {}, treating as unclassified", character, jlpt_number);
            JlptLevel::Unclassified
        });
        let frequency_rank = reader.read_i32_le()?;

        let count = reader.read_count("reading count")?;
        let mut readings = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            readings.push(reader.read_string()?);
        }

        Ok(Self {
            character,
            frequency_rank,
            jlpt,
            readings,
        })
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 4];
        writer.write_string(self.character.encode_utf8(&mut buf))?;
        writer.write_i32_le(self.jlpt.number())?;
        writer.write_i32_le(self.frequency_rank)?;
        writer.write_count(self.readings.len())?;
        for reading in &self.readings {
            writer.write_string(reading)?;
        }
        Ok(())
    }
}

/// In-memory kanji dictionary keyed by character.
#[derive(Debug, Clone, Default)]
pub struct KanjiTable {
    entries: Vec<KanjiEntry>,
    index: HashMap<char, usize>,
    /// FNV-1a over every pushed character and difficulty, 0 while empty.
    fingerprint: u64,
}

impl KanjiTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a whole dictionary dump, records in file order until end of data.
    pub fn load(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(bytes);
        let mut table = Self::new();
        while (cursor.position() as usize) < bytes.len() {
            table.push(KanjiEntry::read_from(&mut cursor)?);
        }
        tracing::info!("Loaded {} kanji", table.len());
        Ok(table)
    }

    /// Append an entry; duplicates are kept, lookups see the first one.
    pub fn push(&mut self, entry: KanjiEntry) {
        let mut hash = if self.entries.is_empty() { FNV_OFFSET } else { self.fingerprint };
        let bytes = (entry.character as u32)
            .to_le_bytes()
            .into_iter()
            .chain(entry.difficulty().to_le_bytes());
        for byte in bytes {
            hash = (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
        }
        self.fingerprint = hash;

        self.index.entry(entry.character).or_insert(self.entries.len());
        self.entries.push(entry);
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            entry.write_to(writer)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, c: char) -> Option<&KanjiEntry> {
        self.index.get(&c).map(|&idx| &self.entries[idx])
    }

    pub fn is_kanji(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    pub fn readings(&self, c: char) -> Option<&[String]> {
        self.entry(c).map(|e| e.readings.as_slice())
    }

    pub fn try_difficulty(&self, c: char) -> Option<i32> {
        self.entry(c).map(KanjiEntry::difficulty)
    }

    /// # Panics
    ///
    /// If `c` is not in the dictionary; check [`KanjiTable::is_kanji`] first.
    pub fn difficulty(&self, c: char) -> i32 {
        match self.try_difficulty(c) {
            Some(difficulty) => difficulty,
            None => panic!("difficulty requested for unknown kanji {c:?}"),
        }
    }
}

impl KanjiSource for KanjiTable {
    fn is_kanji(&self, c: char) -> bool {
        KanjiTable::is_kanji(self, c)
    }

    fn difficulty(&self, c: char) -> i32 {
        KanjiTable::difficulty(self, c)
    }

    fn fingerprint(&self) -> u64 {
        KanjiTable::fingerprint(self)
    }
}
