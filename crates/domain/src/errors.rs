use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Resolution cache error: {0}")]
    CacheError(String),

    #[error("Rule source fetch error for {url}: {reason}")]
    SourceFetchError { url: String, reason: String },

    #[error("Rule file write error: {0}")]
    OutputWriteError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport failure talking to {server}: {reason}")]
    TransportFailure { server: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
