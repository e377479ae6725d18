use serde::{Deserialize, Serialize};

fn default_max_sentence_length() -> usize {
    60
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LevelConfig {
    /// Longest sentence (in characters) the play screen can lay out
    #[serde(default = "default_max_sentence_length")]
    pub max_sentence_length: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            max_sentence_length: default_max_sentence_length(),
        }
    }
}
