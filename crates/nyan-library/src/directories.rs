use std::fs;
use std::io;

use nyan_config::Config;

/// Create the levels, scores and input method directories if missing.
pub fn ensure_directories(config: &Config) -> io::Result<()> {
    for dir in [
        config.paths.levels(),
        config.paths.scores(),
        config.paths.input_methods(),
    ] {
        if !dir.is_dir() {
            tracing::info!("Creating {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
    }
    Ok(())
}
