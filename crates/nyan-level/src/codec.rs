//! `.nyl` level files, format version 2.
//!
//! ```text
//! string  "NYLv2"
//! string  level name, string author
//! int32   native width, int32 native height
//! byte    scale mode
//! int32   input offset x, int32 input offset y
//! int32   page count, then per page:
//!   int32  background length; 0 is followed by one 0x00 placeholder byte
//!   bytes  background data
//!   byte   page scale mode
//!   int32  sentence count, then per sentence:
//!     float32 x, y, width, height
//!     string  text
//!     float32 text size, float32 outline size
//!     byte    packed flags (see SentenceFlags)
//!     int32   furigana count, then that many strings
//! ```

use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use nyan_core::binary::{ReadBinaryExt, WriteBinaryExt};
use nyan_core::fs::atomic_write;
use nyan_core::{DecodeError, FormatError};

use crate::flags::SentenceFlags;
use crate::model::{Level, Page, Rect, ScaleMode, SentenceObject};

pub const LEVEL_MAGIC: &str = "NYLv2";

/// Longest leading string still treated as a possible magic.
const MAX_MAGIC_LEN: usize = 16;

/// File extension of level files, without the dot.
pub const LEVEL_EXTENSION: &str = "nyl";

impl Level {
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_string(LEVEL_MAGIC)?;
        w.write_string(&self.name)?;
        w.write_string(&self.author)?;
        w.write_i32_le(self.native_width)?;
        w.write_i32_le(self.native_height)?;
        w.write_byte(self.scale_mode.as_byte())?;
        w.write_i32_le(self.input_offset.0)?;
        w.write_i32_le(self.input_offset.1)?;

        w.write_count(self.pages.len())?;
        for page in &self.pages {
            write_page(w, page)?;
        }
        Ok(())
    }

    /// Decode a level; `file_name` is attached to the result as-is.
    pub fn read_from<R: Read + ?Sized>(r: &mut R, file_name: &str) -> Result<Self, DecodeError> {
        let magic = r.read_string_max(MAX_MAGIC_LEN).map_err(|e| match e {
            DecodeError::Invalid(_) => DecodeError::BadMagic {
                expected: LEVEL_MAGIC.into(),
                found: String::new(),
            },
            other => other,
        })?;
        if magic != LEVEL_MAGIC {
            return Err(if magic.starts_with("NYL") {
                DecodeError::VersionMismatch {
                    expected: LEVEL_MAGIC.into(),
                    found: magic,
                }
            } else {
                DecodeError::BadMagic {
                    expected: LEVEL_MAGIC.into(),
                    found: magic,
                }
            });
        }

        let name = r.read_string()?;
        let author = r.read_string()?;
        let native_width = r.read_i32_le()?;
        let native_height = r.read_i32_le()?;
        let scale_byte = r.read_byte()?;
        let scale_mode = ScaleMode::from_byte(scale_byte)
            .ok_or_else(|| DecodeError::Invalid(format!("unknown scale mode {scale_byte}")))?;
        let input_offset = (r.read_i32_le()?, r.read_i32_le()?);

        let page_count = r.read_count("page count")?;
        let mut pages = Vec::with_capacity(page_count.min(256));
        for _ in 0..page_count {
            pages.push(read_page(r)?);
        }

        Ok(Level {
            file_name: file_name.to_string(),
            name,
            author,
            native_width,
            native_height,
            scale_mode,
            input_offset,
            pages,
        })
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8], file_name: &str) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(bytes);
        let level = Self::read_from(&mut cursor, file_name)?;
        let trailing = bytes.len() - cursor.position() as usize;
        if trailing > 0 {
            tracing::debug!("{}: ignoring {} trailing bytes", file_name, trailing);
        }
        Ok(level)
    }

    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path).map_err(|e| FormatError::from_io(path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let level = Self::from_bytes(&bytes, &file_name).map_err(|e| FormatError::decode(path, e))?;
        tracing::info!(
            "Loaded level {:?} ({} pages) from {}",
            level.name,
            level.pages.len(),
            path.display()
        );
        Ok(level)
    }

    /// Write the whole level, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        atomic_write(path, |w| self.write_to(w)).map_err(|e| {
            tracing::error!("Failed to save level {}: {}", path.display(), e);
            FormatError::write(path, e)
        })?;
        tracing::info!("Saved level {:?} to {}", self.name, path.display());
        Ok(())
    }
}

fn write_page<W: Write + ?Sized>(w: &mut W, page: &Page) -> io::Result<()> {
    match page.background.as_deref() {
        Some(data) if !data.is_empty() => {
            w.write_count(data.len())?;
            w.write_all(data)?;
        }
        _ => {
            w.write_i32_le(0)?;
            w.write_byte(0)?;
        }
    }
    w.write_byte(page.background_scale_mode)?;

    w.write_count(page.sentences.len())?;
    for sentence in &page.sentences {
        write_sentence(w, sentence)?;
    }
    Ok(())
}

fn read_page<R: Read + ?Sized>(r: &mut R) -> Result<Page, DecodeError> {
    let length = r.read_count("background length")?;
    let background = if length == 0 {
        r.read_byte()?;
        None
    } else {
        Some(r.read_bytes(length)?)
    };
    let background_scale_mode = r.read_byte()?;

    let count = r.read_count("sentence count")?;
    let mut sentences = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        sentences.push(read_sentence(r)?);
    }

    Ok(Page {
        background,
        background_scale_mode,
        sentences,
    })
}

fn write_sentence<W: Write + ?Sized>(w: &mut W, s: &SentenceObject) -> io::Result<()> {
    w.write_f32_le(s.rect.x)?;
    w.write_f32_le(s.rect.y)?;
    w.write_f32_le(s.rect.width)?;
    w.write_f32_le(s.rect.height)?;
    w.write_string(&s.text)?;
    w.write_f32_le(s.text_size)?;
    w.write_f32_le(s.outline_size)?;
    w.write_byte(s.flags().encode())?;
    w.write_count(s.furigana.len())?;
    for furigana in &s.furigana {
        w.write_string(furigana)?;
    }
    Ok(())
}

fn read_sentence<R: Read + ?Sized>(r: &mut R) -> Result<SentenceObject, DecodeError> {
    let rect = Rect::new(r.read_f32_le()?, r.read_f32_le()?, r.read_f32_le()?, r.read_f32_le()?);
    let text = r.read_string()?;
    let text_size = r.read_f32_le()?;
    let outline_size = r.read_f32_le()?;
    let flags = SentenceFlags::decode(r.read_byte()?)?;

    let count = r.read_count("furigana count")?;
    let mut furigana = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        furigana.push(r.read_string()?);
    }

    Ok(SentenceObject {
        rect,
        text,
        text_size,
        outline_size,
        alignment: flags.alignment,
        bold: flags.bold,
        vertical: flags.vertical,
        color: flags.color,
        furigana,
    })
}
