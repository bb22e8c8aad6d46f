use async_trait::async_trait;
use ferrous_rules_application::ports::LocalRuleReader;
use ferrous_rules_domain::DomainError;

const COMMENT_PREFIXES: [&str; 3] = ["#", "!", "//"];

/// Operator-maintained override list on local disk.
pub struct LocalRuleFile {
    path: String,
}

impl LocalRuleFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LocalRuleReader for LocalRuleFile {
    async fn read_lines(&self) -> Result<Vec<String>, DomainError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::IoError(format!("failed to read {}: {}", self.path, e)))?;

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_comment(line))
            .map(str::to_string)
            .collect())
    }

    fn location(&self) -> &str {
        &self.path
    }
}

fn is_comment(line: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| line.starts_with(p))
}
