use crate::ports::CacheEntries;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicBool, Ordering};

/// Concurrent domain -> resolvable map shared by validation workers.
///
/// Loaded once per run and flushed once at the end; `is_dirty` tells the
/// caller whether a flush is needed.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<String, bool, FxBuildHasher>,
    dirty: AtomicBool,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: CacheEntries) -> Self {
        let map = DashMap::with_capacity_and_hasher(entries.len(), FxBuildHasher);
        for (domain, resolvable) in entries {
            map.insert(domain, resolvable);
        }

        Self {
            entries: map,
            dirty: AtomicBool::new(false),
        }
    }

    pub fn get_or_none(&self, domain: &str) -> Option<bool> {
        self.entries.get(domain).map(|entry| *entry)
    }

    pub fn put(&self, domain: &str, resolvable: bool) {
        let previous = self.entries.insert(domain.to_string(), resolvable);
        if previous != Some(resolvable) {
            self.dirty.store(true, Ordering::Release);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> CacheEntries {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
