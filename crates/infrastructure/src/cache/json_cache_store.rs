use async_trait::async_trait;
use ferrous_rules_application::ports::{CacheEntries, ResolutionCacheStore};
use ferrous_rules_domain::DomainError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolution cache persisted as one JSON object of `domain -> resolvable`.
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ResolutionCacheStore for JsonFileCacheStore {
    async fn load(&self) -> Result<CacheEntries, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No resolution cache on disk");
                return Ok(CacheEntries::new());
            }
            Err(e) => {
                return Err(DomainError::CacheError(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if contents.trim().is_empty() {
            return Ok(CacheEntries::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            DomainError::CacheError(format!("corrupt cache {}: {}", self.path.display(), e))
        })
    }

    /// Written to a sibling temp file first, then renamed over the old cache.
    async fn save(&self, entries: &CacheEntries) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::CacheError(format!("failed to serialize cache: {}", e)))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            DomainError::CacheError(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::CacheError(format!(
                "failed to move cache into place at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Resolution cache persisted");
        Ok(())
    }
}
