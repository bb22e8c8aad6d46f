use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Upstream rule lists, merged in this order
    #[serde(default)]
    pub upstream: Vec<String>,

    /// Operator-maintained override file
    #[serde(default = "default_local_file")]
    pub local_file: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            upstream: vec![],
            local_file: default_local_file(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_retries: default_fetch_retries(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_local_file() -> String {
    "mylist.txt".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

fn default_fetch_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    concat!("ferrous-rules/", env!("CARGO_PKG_VERSION")).to_string()
}
