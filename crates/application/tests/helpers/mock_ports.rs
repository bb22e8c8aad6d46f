#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_rules_application::ports::{
    CacheEntries, DomainResolver, LocalRuleReader, ResolutionCacheStore, RuleFileWriter,
    RuleSourceFetcher,
};
use ferrous_rules_domain::{DomainError, ResolutionOutcome};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockDomainResolver {
    outcomes: Arc<std::sync::RwLock<HashMap<String, ResolutionOutcome>>>,
    delays: Arc<std::sync::RwLock<HashMap<String, Duration>>>,
    default_outcome: ResolutionOutcome,
    calls: Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockDomainResolver {
    pub fn new() -> Self {
        Self::with_default(ResolutionOutcome::Resolvable)
    }

    pub fn with_default(default_outcome: ResolutionOutcome) -> Self {
        Self {
            outcomes: Arc::new(std::sync::RwLock::new(HashMap::new())),
            delays: Arc::new(std::sync::RwLock::new(HashMap::new())),
            default_outcome,
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn set_outcome(&self, domain: &str, outcome: ResolutionOutcome) {
        self.outcomes
            .write()
            .unwrap()
            .insert(domain.to_string(), outcome);
    }

    pub fn set_delay(&self, domain: &str, delay: Duration) {
        self.delays
            .write()
            .unwrap()
            .insert(domain.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockDomainResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainResolver for MockDomainResolver {
    async fn resolve(&self, domain: &str, _servers: &[SocketAddr]) -> ResolutionOutcome {
        self.calls.lock().unwrap().push(domain.to_string());

        let delay = self.delays.read().unwrap().get(domain).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.outcomes
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(self.default_outcome)
    }
}

#[derive(Clone, Default)]
pub struct MockResolutionCacheStore {
    entries: Arc<RwLock<CacheEntries>>,
    fail_load: Arc<RwLock<bool>>,
    saves: Arc<RwLock<usize>>,
}

impl MockResolutionCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_entries(entries: Vec<(&str, bool)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.write().await;
            for (domain, resolvable) in entries {
                map.insert(domain.to_string(), resolvable);
            }
        }
        store
    }

    pub async fn set_fail_load(&self, fail: bool) {
        *self.fail_load.write().await = fail;
    }

    pub async fn entries(&self) -> CacheEntries {
        self.entries.read().await.clone()
    }

    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl ResolutionCacheStore for MockResolutionCacheStore {
    async fn load(&self) -> Result<CacheEntries, DomainError> {
        if *self.fail_load.read().await {
            return Err(DomainError::CacheError("corrupt cache".to_string()));
        }
        Ok(self.entries.read().await.clone())
    }

    async fn save(&self, entries: &CacheEntries) -> Result<(), DomainError> {
        *self.entries.write().await = entries.clone();
        *self.saves.write().await += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockRuleSourceFetcher {
    sources: Arc<RwLock<HashMap<String, Result<Vec<String>, DomainError>>>>,
}

impl MockRuleSourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_source(&self, url: &str, lines: &[&str]) {
        self.sources.write().await.insert(
            url.to_string(),
            Ok(lines.iter().map(|l| l.to_string()).collect()),
        );
    }

    pub async fn set_failure(&self, url: &str) {
        self.sources.write().await.insert(
            url.to_string(),
            Err(DomainError::SourceFetchError {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            }),
        );
    }
}

#[async_trait]
impl RuleSourceFetcher for MockRuleSourceFetcher {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>, DomainError> {
        self.sources
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::SourceFetchError {
                    url: url.to_string(),
                    reason: "no mock source".to_string(),
                })
            })
    }
}

#[derive(Clone)]
pub struct MockLocalRuleReader {
    lines: Option<Vec<String>>,
}

impl MockLocalRuleReader {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: Some(lines.iter().map(|l| l.to_string()).collect()),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn failing() -> Self {
        Self { lines: None }
    }
}

#[async_trait]
impl LocalRuleReader for MockLocalRuleReader {
    async fn read_lines(&self) -> Result<Vec<String>, DomainError> {
        self.lines
            .clone()
            .ok_or_else(|| DomainError::IoError("mylist.txt: No such file".to_string()))
    }

    fn location(&self) -> &str {
        "mylist.txt"
    }
}

#[derive(Clone, Default)]
pub struct MockRuleFileWriter {
    written: Arc<RwLock<Option<String>>>,
}

impl MockRuleFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contents(&self) -> Option<String> {
        self.written.read().await.clone()
    }
}

#[async_trait]
impl RuleFileWriter for MockRuleFileWriter {
    async fn write(&self, contents: &str) -> Result<(), DomainError> {
        *self.written.write().await = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> &str {
        "merged_rules.txt"
    }
}
