//! Error types shared by every binary codec in the workspace.

use std::io;
use std::path::Path;

/// Failure while decoding a byte stream, independent of where the bytes came from.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: String, found: String },

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("stream ended early")]
    Truncated,

    #[error("invalid data: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated
        } else {
            DecodeError::Io(err)
        }
    }
}

/// A codec failure tied to the file it happened in.
///
/// Callers treat every variant as "file is absent or corrupt": meta files get
/// regenerated, levels and leaderboards get reported.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("{file}: file not found")]
    Missing { file: String },

    #[error("{file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: DecodeError,
    },

    #[error("{file}: write failed: {source}")]
    Write {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl FormatError {
    pub fn missing(path: &Path) -> Self {
        FormatError::Missing {
            file: display_name(path),
        }
    }

    pub fn decode(path: &Path, source: DecodeError) -> Self {
        FormatError::Decode {
            file: display_name(path),
            source,
        }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        FormatError::Write {
            file: display_name(path),
            source,
        }
    }

    /// Map an open/read error, keeping "not found" distinguishable.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::missing(path)
        } else {
            Self::decode(path, err.into())
        }
    }

    /// Name of the offending file.
    pub fn file(&self) -> &str {
        match self {
            FormatError::Missing { file }
            | FormatError::Decode { file, .. }
            | FormatError::Write { file, .. } => file,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FormatError::Missing { .. })
    }

    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            FormatError::Decode {
                source: DecodeError::Truncated,
                ..
            }
        )
    }

    pub fn is_bad_magic(&self) -> bool {
        matches!(
            self,
            FormatError::Decode {
                source: DecodeError::BadMagic { .. },
                ..
            }
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
