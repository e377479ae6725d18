use serde::{Deserialize, Serialize};

fn default_input_method() -> String {
    "hepburn".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct InputConfig {
    /// Input method file name under `InputMethods/`, without `.cfg`
    #[serde(default = "default_input_method")]
    pub method: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            method: default_input_method(),
        }
    }
}
