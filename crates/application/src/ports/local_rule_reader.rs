use async_trait::async_trait;
use ferrous_rules_domain::DomainError;

#[async_trait]
pub trait LocalRuleReader: Send + Sync {
    /// Trimmed, non-empty, non-comment lines of the operator override file.
    async fn read_lines(&self) -> Result<Vec<String>, DomainError>;

    fn location(&self) -> &str;
}
