use async_trait::async_trait;
use ferrous_rules_domain::DomainError;

#[async_trait]
pub trait RuleFileWriter: Send + Sync {
    async fn write(&self, contents: &str) -> Result<(), DomainError>;

    fn location(&self) -> &str;
}
