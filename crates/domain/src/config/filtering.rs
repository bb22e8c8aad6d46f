use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilteringConfig {
    /// Lines starting with any of these prefixes are dropped before parsing
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,

    /// Normalized lines must start with one of these to be considered a rule
    #[serde(default = "default_supported_rule_types")]
    pub supported_rule_types: Vec<String>,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            excluded_prefixes: default_excluded_prefixes(),
            supported_rule_types: default_supported_rule_types(),
        }
    }
}

fn default_excluded_prefixes() -> Vec<String> {
    ["!", "#", "//", "$", "||$", "adguard_"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_supported_rule_types() -> Vec<String> {
    vec!["||".to_string(), "@@||".to_string()]
}
