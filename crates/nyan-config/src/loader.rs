use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_time_slice_ms() -> u64 {
    8
}

fn default_records_per_step() -> usize {
    256
}

fn default_progress_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LoaderConfig {
    /// Budget per frame when driving a load cooperatively
    #[serde(default = "default_time_slice_ms")]
    pub time_slice_ms: u64,
    /// Kanji dictionary records read per step
    #[serde(default = "default_records_per_step")]
    pub records_per_step: usize,
    /// Progress channel capacity for background loads
    #[serde(default = "default_progress_capacity")]
    pub progress_capacity: usize,
}

impl LoaderConfig {
    pub fn time_slice(&self) -> Duration {
        Duration::from_millis(self.time_slice_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            time_slice_ms: default_time_slice_ms(),
            records_per_step: default_records_per_step(),
            progress_capacity: default_progress_capacity(),
        }
    }
}
