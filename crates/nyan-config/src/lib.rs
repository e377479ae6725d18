use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::input::InputConfig;
use self::level::LevelConfig;
use self::loader::LoaderConfig;
use self::paths::PathsConfig;

pub mod input;
pub mod level;
pub mod loader;
pub mod paths;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub level: LevelConfig,
    pub loader: LoaderConfig,
    pub input: InputConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a JSON file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => {
                tracing::info!("Loading config from {}", path.display());
                Ok(serde_json::from_str(&data)?)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
