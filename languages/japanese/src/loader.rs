use std::io::Cursor;
use std::path::Path;

use nyan_core::{DecodeError, FormatError, Progress, Step, Stepper};

use crate::kanji::{KanjiEntry, KanjiTable};

/// Incremental kanji dictionary load.
///
/// The dump is read into memory up front; each step decodes at most
/// `records_per_step` records. Progress is reported in bytes.
pub struct KanjiDictionaryLoader {
    cursor: Cursor<Vec<u8>>,
    table: KanjiTable,
    records_per_step: usize,
    last: Option<char>,
    name: String,
    failed: Option<DecodeError>,
}

impl KanjiDictionaryLoader {
    pub fn new(bytes: Vec<u8>, records_per_step: usize) -> Self {
        Self::named("kanji dictionary", bytes, records_per_step)
    }

    fn named(name: &str, bytes: Vec<u8>, records_per_step: usize) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            table: KanjiTable::new(),
            records_per_step: records_per_step.max(1),
            last: None,
            name: name.to_string(),
            failed: None,
        }
    }

    /// Open a dictionary dump from disk
    pub fn open(path: &Path, records_per_step: usize) -> Result<Self, FormatError> {
        tracing::info!("Loading kanji dictionary from file: {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| FormatError::from_io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::named(&name, bytes, records_per_step))
    }

    /// Load a whole dump without yielding
    pub fn load_file(path: &Path) -> Result<KanjiTable, FormatError> {
        Self::open(path, usize::MAX)?.run()
    }

    fn total(&self) -> usize {
        self.cursor.get_ref().len()
    }

    fn done(&self) -> usize {
        self.cursor.position() as usize
    }
}

impl Stepper for KanjiDictionaryLoader {
    type Output = Result<KanjiTable, FormatError>;

    fn step(&mut self) -> Step<Self::Output> {
        if let Some(err) = self.failed.take() {
            return Step::Done(Err(FormatError::decode(Path::new(&self.name), err)));
        }

        for _ in 0..self.records_per_step {
            if self.done() >= self.total() {
                let table = std::mem::take(&mut self.table);
                tracing::info!("Loaded {} kanji from {}", table.len(), self.name);
                return Step::Done(Ok(table));
            }

            match KanjiEntry::read_from(&mut self.cursor) {
                Ok(entry) => {
                    self.last = Some(entry.character);
                    self.table.push(entry);
                }
                Err(err) => {
                    tracing::warn!("Kanji dictionary {} is corrupt: {}", self.name, err);
                    self.failed = Some(err);
                    break;
                }
            }
        }

        Step::Pending(self.progress())
    }

    fn progress(&self) -> Progress {
        let current = self.last.map(String::from).unwrap_or_default();
        Progress::new(current, self.done(), self.total())
    }
}
