use async_trait::async_trait;
use ferrous_rules_application::ports::RuleFileWriter;
use ferrous_rules_domain::DomainError;
use std::path::Path;

pub struct FileRuleWriter {
    path: String,
}

impl FileRuleWriter {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RuleFileWriter for FileRuleWriter {
    async fn write(&self, contents: &str) -> Result<(), DomainError> {
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::OutputWriteError(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| DomainError::OutputWriteError(format!("{}: {}", self.path, e)))
    }

    fn location(&self) -> &str {
        &self.path
    }
}
