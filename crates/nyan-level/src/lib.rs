//! Level data model and its on-disk formats.
//!
//! `.nyl` holds the authored level, `.nyl.meta` a cached summary used by the
//! level listing so it does not have to decode every level.

pub mod codec;
pub mod flags;
pub mod meta;
pub mod model;
pub mod stats;
pub mod validate;

pub use codec::{LEVEL_EXTENSION, LEVEL_MAGIC};
pub use flags::{Alignment, SentenceFlags};
pub use meta::{LevelMeta, SourceStamp};
pub use model::{Level, Page, Rect, ScaleMode, SentenceObject};
pub use stats::{LevelStats, derive_stats};
pub use validate::{ParserResult, parse_level};
