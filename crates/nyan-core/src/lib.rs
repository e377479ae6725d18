pub mod binary;
pub mod error;
pub mod fs;
pub mod language;
pub mod preprocess;
pub mod progress;

pub use error::{DecodeError, FormatError};
pub use language::KanjiSource;
pub use progress::{Progress, Step, Stepper};
