use async_trait::async_trait;
use ferrous_rules_domain::DomainError;
use std::collections::BTreeMap;

/// Domain -> resolvable. Ordered so persisted snapshots are stable.
pub type CacheEntries = BTreeMap<String, bool>;

#[async_trait]
pub trait ResolutionCacheStore: Send + Sync {
    async fn load(&self) -> Result<CacheEntries, DomainError>;
    async fn save(&self, entries: &CacheEntries) -> Result<(), DomainError>;
}
