use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,

    #[serde(default = "default_title")]
    pub title: String,

    /// Emit local-override and polarity-conflict sections ahead of the standard rules
    #[serde(default = "default_true")]
    pub include_review_sections: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            title: default_title(),
            include_review_sections: true,
        }
    }
}

fn default_output_path() -> String {
    "merged_rules.txt".to_string()
}

fn default_title() -> String {
    "Ferrous Rules merged DNS filter list".to_string()
}

fn default_true() -> bool {
    true
}
