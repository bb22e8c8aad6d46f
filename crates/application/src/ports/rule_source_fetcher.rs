use async_trait::async_trait;
use ferrous_rules_domain::DomainError;

#[async_trait]
pub trait RuleSourceFetcher: Send + Sync {
    /// Fetch one upstream list and split it into trimmed, non-empty lines.
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>, DomainError>;
}
