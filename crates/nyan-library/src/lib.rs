//! Everything the game does with its data directory: creating it, loading
//! the dictionary, listing levels and input methods, and running those loads
//! either a frame at a time or on a background task.

mod dictionary;
mod directories;
mod driver;
mod scan;

pub use dictionary::DictionaryLoad;
pub use directories::ensure_directories;
pub use driver::{BackgroundLoad, DriverError, drive_frame, spawn_stepper};
pub use nyan_core::progress::drive;
pub use scan::{InputMethodScan, LevelListing, LevelScan, ScanReport};

#[cfg(test)]
mod tests;
