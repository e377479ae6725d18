use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use nyan_config::paths::PathsConfig;
use nyan_core::{FormatError, KanjiSource, Progress, Step, Stepper};
use nyan_lang_japanese::KanaTable;
use nyan_level::{LEVEL_EXTENSION, LevelMeta};
use nyan_score::Leaderboard;

const INPUT_METHOD_EXTENSION: &str = "cfg";

/// Files in `dir` with the given extension, sorted by name.
fn files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One row of the level select screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelListing {
    pub file_name: String,
    pub path: PathBuf,
    pub meta: LevelMeta,
}

impl LevelListing {
    /// Levels that failed validation are listed with a warning and cannot be started.
    pub fn is_playable(&self) -> bool {
        self.meta.is_playable()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn leaderboard_path(&self, paths: &PathsConfig) -> PathBuf {
        paths.leaderboard_for(&self.stem())
    }

    /// Scores for this level; a level never played has an empty board.
    pub fn leaderboard(&self, paths: &PathsConfig) -> Result<Leaderboard, FormatError> {
        Leaderboard::load_or_default(&self.leaderboard_path(paths))
    }
}

/// What a level directory scan found.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub listings: Vec<LevelListing>,
    /// Level files that could not be read at all.
    pub skipped: Vec<FormatError>,
}

/// Lists `Levels/*.nyl`, one level per step, regenerating stale metas on the way.
pub struct LevelScan<K> {
    pending: Vec<PathBuf>,
    next: usize,
    kanji: K,
    max_sentence_length: usize,
    report: ScanReport,
}

impl<K: KanjiSource> LevelScan<K> {
    pub fn new(dir: &Path, kanji: K, max_sentence_length: usize) -> io::Result<Self> {
        let pending = files_with_extension(dir, LEVEL_EXTENSION)?;
        tracing::info!("Found {} levels in {}", pending.len(), dir.display());
        Ok(Self {
            pending,
            next: 0,
            kanji,
            max_sentence_length,
            report: ScanReport::default(),
        })
    }
}

impl<K: KanjiSource> Stepper for LevelScan<K> {
    type Output = ScanReport;

    fn step(&mut self) -> Step<ScanReport> {
        let Some(path) = self.pending.get(self.next) else {
            let report = std::mem::take(&mut self.report);
            tracing::info!(
                "Level scan done: {} listed, {} skipped",
                report.listings.len(),
                report.skipped.len()
            );
            return Step::Done(report);
        };

        match LevelMeta::load_or_regenerate(path, &self.kanji, self.max_sentence_length) {
            Ok(meta) => {
                if !meta.is_playable() {
                    tracing::warn!("{}: {}", file_name(path), meta.parser_result.message());
                }
                self.report.listings.push(LevelListing {
                    file_name: file_name(path),
                    path: path.clone(),
                    meta,
                });
            }
            Err(e) => {
                tracing::warn!("Skipping level: {}", e);
                self.report.skipped.push(e);
            }
        }
        self.next += 1;

        Step::Pending(self.progress())
    }

    fn progress(&self) -> Progress {
        let current = self
            .next
            .checked_sub(1)
            .map(|i| file_name(&self.pending[i]))
            .unwrap_or_default();
        Progress::new(current, self.next, self.pending.len())
    }
}

/// Lists the usable `InputMethods/*.cfg` files by name, one file per step.
///
/// A file whose mapping turns out empty is left out.
pub struct InputMethodScan {
    pending: Vec<PathBuf>,
    next: usize,
    names: Vec<String>,
}

impl InputMethodScan {
    pub fn new(dir: &Path) -> io::Result<Self> {
        Ok(Self {
            pending: files_with_extension(dir, INPUT_METHOD_EXTENSION)?,
            next: 0,
            names: Vec::new(),
        })
    }
}

impl Stepper for InputMethodScan {
    type Output = Vec<String>;

    fn step(&mut self) -> Step<Vec<String>> {
        let Some(path) = self.pending.get(self.next) else {
            return Step::Done(std::mem::take(&mut self.names));
        };

        if KanaTable::load_file(path).is_empty() {
            tracing::warn!("Input method {} has no mappings", path.display());
        } else if let Some(stem) = path.file_stem() {
            self.names.push(stem.to_string_lossy().into_owned());
        }
        self.next += 1;

        Step::Pending(self.progress())
    }

    fn progress(&self) -> Progress {
        let current = self
            .next
            .checked_sub(1)
            .map(|i| file_name(&self.pending[i]))
            .unwrap_or_default();
        Progress::new(current, self.next, self.pending.len())
    }
}
