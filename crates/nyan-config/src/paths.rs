use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_levels_dir() -> String {
    "Levels".to_string()
}

fn default_scores_dir() -> String {
    "Scores".to_string()
}

fn default_input_methods_dir() -> String {
    "InputMethods".to_string()
}

fn default_kanji_dictionary() -> String {
    "kanji.bin".to_string()
}

/// Where the data files live. Relative directories resolve against `root`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_levels_dir")]
    pub levels_dir: String,
    #[serde(default = "default_scores_dir")]
    pub scores_dir: String,
    #[serde(default = "default_input_methods_dir")]
    pub input_methods_dir: String,
    #[serde(default = "default_kanji_dictionary")]
    pub kanji_dictionary: String,
}

impl PathsConfig {
    pub fn levels(&self) -> PathBuf {
        self.root.join(&self.levels_dir)
    }

    pub fn scores(&self) -> PathBuf {
        self.root.join(&self.scores_dir)
    }

    pub fn input_methods(&self) -> PathBuf {
        self.root.join(&self.input_methods_dir)
    }

    pub fn kanji_dictionary(&self) -> PathBuf {
        self.root.join(&self.kanji_dictionary)
    }

    /// `Scores/<level name>.nys`, keyed by the level file stem
    pub fn leaderboard_for(&self, level_stem: &str) -> PathBuf {
        self.scores().join(format!("{level_stem}.nys"))
    }

    /// `InputMethods/<name>.cfg`
    pub fn input_method(&self, name: &str) -> PathBuf {
        self.input_methods().join(format!("{name}.cfg"))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            levels_dir: default_levels_dir(),
            scores_dir: default_scores_dir(),
            input_methods_dir: default_input_methods_dir(),
            kanji_dictionary: default_kanji_dictionary(),
        }
    }
}
