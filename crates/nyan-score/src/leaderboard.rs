use std::io::{self, BufRead, Cursor, Write};
use std::path::Path;

use nyan_core::binary::{ReadBinaryExt, WriteBinaryExt};
use nyan_core::fs::atomic_write;
use nyan_core::{DecodeError, FormatError};

use crate::score::HighScore;

pub const SCORE_TAG: &[u8; 3] = b"NYS";
pub const SCORE_VERSION: &str = "v1";
pub const SCORE_EXTENSION: &str = "nys";

/// Entries kept per level.
pub const CAPACITY: usize = 10;

/// Best plays of one level, stored lowest score first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leaderboard {
    scores: Vec<HighScore>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.scores.len() >= CAPACITY
    }

    /// Storage order, ascending by score.
    pub fn scores(&self) -> &[HighScore] {
        &self.scores
    }

    /// Display order, highest score first.
    pub fn iter_ranked(&self) -> impl Iterator<Item = &HighScore> {
        self.scores.iter().rev()
    }

    pub fn best(&self) -> Option<&HighScore> {
        self.scores.last()
    }

    /// Insert a finished play. Returns `false` if it did not make the board.
    ///
    /// On a full board the new score has to beat the current lowest; a tie
    /// keeps the older entry. Among equal scores the older one ranks higher.
    pub fn add(&mut self, score: HighScore) -> bool {
        if self.is_full() && self.scores.first().is_some_and(|low| score.score <= low.score) {
            tracing::debug!("{} ({}) did not make the leaderboard", score.username, score.score);
            return false;
        }

        let at = self.scores.partition_point(|s| s.score < score.score);
        self.scores.insert(at, score);
        if self.scores.len() > CAPACITY {
            let excess = self.scores.len() - CAPACITY;
            self.scores.drain(..excess);
        }
        true
    }

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(SCORE_TAG)?;
        w.write_string(SCORE_VERSION)?;
        for score in &self.scores {
            score.write_to(w)?;
        }
        Ok(())
    }

    /// Decode records until the stream ends on a record boundary.
    pub fn read_from<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        r.expect_tag(SCORE_TAG)?;
        let version = r.read_string()?;
        if version != SCORE_VERSION {
            return Err(DecodeError::VersionMismatch {
                expected: SCORE_VERSION.to_string(),
                found: version,
            });
        }

        let mut scores = Vec::new();
        while !r.fill_buf()?.is_empty() {
            scores.push(HighScore::read_from(r)?);
        }

        // keep the invariant even for hand-edited files
        scores.sort_by_key(|s| s.score);
        if scores.len() > CAPACITY {
            tracing::warn!("Leaderboard has {} entries, keeping the best {}", scores.len(), CAPACITY);
            let excess = scores.len() - CAPACITY;
            scores.drain(..excess);
        }
        Ok(Self { scores })
    }

    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path).map_err(|e| FormatError::from_io(path, e))?;
        let board = Self::read_from(&mut Cursor::new(bytes)).map_err(|e| FormatError::decode(path, e))?;
        tracing::debug!("Loaded {} scores from {}", board.len(), path.display());
        Ok(board)
    }

    /// Load, treating a missing file as an empty board.
    pub fn load_or_default(path: &Path) -> Result<Self, FormatError> {
        match Self::load(path) {
            Err(e) if e.is_missing() => Ok(Self::new()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        atomic_write(path, |w| self.write_to(w)).map_err(|e| FormatError::write(path, e))
    }
}
