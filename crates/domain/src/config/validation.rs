use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_DNS_PORT: u16 = 53;

/// DNS validation of surviving block rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tried in order for every domain; `ip` or `ip:port`
    #[serde(default = "default_dns_servers")]
    pub dns_servers: Vec<String>,

    /// Number of resolver workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_server_timeout_ms")]
    pub server_timeout_ms: u64,

    /// Overall budget for one domain across all servers
    #[serde(default = "default_domain_deadline_ms")]
    pub domain_deadline_ms: u64,

    /// Upper bound on the whole validation phase
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Ignore cached outcomes and resolve every block domain again
    #[serde(default)]
    pub force_refresh: bool,

    /// Log progress every N completed lookups
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dns_servers: default_dns_servers(),
            concurrency: default_concurrency(),
            server_timeout_ms: default_server_timeout_ms(),
            domain_deadline_ms: default_domain_deadline_ms(),
            batch_timeout_secs: default_batch_timeout_secs(),
            cache_path: default_cache_path(),
            force_refresh: false,
            progress_interval: default_progress_interval(),
        }
    }
}

impl ValidationConfig {
    pub fn server_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.dns_servers
            .iter()
            .map(|s| parse_server_addr(s))
            .collect()
    }

    pub fn server_timeout(&self) -> Duration {
        Duration::from_millis(self.server_timeout_ms)
    }

    pub fn domain_deadline(&self) -> Duration {
        Duration::from_millis(self.domain_deadline_ms)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

/// Accepts `8.8.8.8`, `8.8.8.8:5353`, `2001:4860:4860::8888` and `[::1]:53`.
pub fn parse_server_addr(server: &str) -> Result<SocketAddr, ConfigError> {
    let server = server.trim();

    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }

    server
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| ConfigError::InvalidServer(server.to_string()))
}

fn default_dns_servers() -> Vec<String> {
    ["223.5.5.5", "119.29.29.29", "8.8.8.8", "1.1.1.1"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_concurrency() -> usize {
    64
}

fn default_server_timeout_ms() -> u64 {
    2000
}

fn default_domain_deadline_ms() -> u64 {
    6000
}

fn default_batch_timeout_secs() -> u64 {
    600
}

fn default_cache_path() -> String {
    "dns_cache.json".to_string()
}

fn default_progress_interval() -> usize {
    500
}

fn default_true() -> bool {
    true
}
