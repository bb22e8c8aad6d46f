use async_trait::async_trait;
use ferrous_rules_application::ports::RuleSourceFetcher;
use ferrous_rules_domain::config::SourcesConfig;
use ferrous_rules_domain::DomainError;
use std::time::Duration;
use tracing::{debug, warn};

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Downloads upstream rule lists over HTTP(S).
pub struct HttpRuleFetcher {
    client: reqwest::Client,
    retries: u32,
}

impl HttpRuleFetcher {
    pub fn new(user_agent: &str, timeout: Duration, retries: u32) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, retries })
    }

    pub fn from_config(config: &SourcesConfig) -> Result<Self, DomainError> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.fetch_timeout_secs),
            config.fetch_retries,
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::SourceFetchError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DomainError::SourceFetchError {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status().as_u16()),
            });
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::SourceFetchError {
                url: url.to_string(),
                reason: format!("failed to read body: {}", e),
            })
    }
}

#[async_trait]
impl RuleSourceFetcher for HttpRuleFetcher {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>, DomainError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), "Rule source downloaded");
                    return Ok(split_lines(&body));
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(url = %url, attempt = attempt, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
