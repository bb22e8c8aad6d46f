use crate::ports::{DomainResolver, ResolutionCacheStore};
use crate::services::ResolutionCache;
use ferrous_rules_domain::config::ValidationConfig;
use ferrous_rules_domain::{ParsedRule, Polarity, ResolutionOutcome};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Scheduling knobs for the validation phase.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub concurrency: usize,
    pub domain_deadline: Duration,
    pub batch_timeout: Duration,
    pub force_refresh: bool,
    pub progress_interval: usize,
}

impl ValidationPolicy {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            domain_deadline: config.domain_deadline(),
            batch_timeout: config.batch_timeout(),
            force_refresh: config.force_refresh,
            progress_interval: config.progress_interval.max(1),
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub total_rules: usize,
    pub allow_exempt: usize,
    pub unique_domains: usize,
    pub cache_hits: usize,
    pub resolved: usize,
    pub resolvable: usize,
    pub not_found: usize,
    pub indeterminate: usize,
    pub timed_out: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub kept: Vec<ParsedRule>,
    pub removed: Vec<ParsedRule>,
    pub stats: ValidationStats,
}

/// Shared completion counter, logged every `interval` lookups.
struct ValidationProgress {
    total: usize,
    completed: AtomicUsize,
    interval: usize,
}

impl ValidationProgress {
    fn new(total: usize, interval: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            interval,
        }
    }

    fn record(&self) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.interval == 0 || done == self.total {
            info!(completed = done, total = self.total, "Validation progress");
        }
    }
}

struct BatchOutcome {
    resolved: FxHashMap<String, ResolutionOutcome>,
    timed_out: BTreeSet<String>,
}

/// Prunes block rules whose domain definitively does not exist.
///
/// Allow rules are never touched. Cached outcomes short-circuit lookups;
/// everything else goes through a fixed pool of resolver workers. A lookup
/// that cannot be settled (all servers failed, per-domain deadline, batch
/// timeout) keeps its rule.
pub struct ValidateRulesUseCase {
    resolver: Arc<dyn DomainResolver>,
    cache_store: Arc<dyn ResolutionCacheStore>,
    servers: Arc<[SocketAddr]>,
    policy: ValidationPolicy,
}

impl ValidateRulesUseCase {
    pub fn new(
        resolver: Arc<dyn DomainResolver>,
        cache_store: Arc<dyn ResolutionCacheStore>,
        servers: Vec<SocketAddr>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            resolver,
            cache_store,
            servers: Arc::from(servers),
            policy,
        }
    }

    #[instrument(skip(self, rules), fields(count = rules.len()))]
    pub async fn execute(&self, rules: Vec<ParsedRule>) -> ValidationReport {
        let cache = self.load_cache().await;

        let mut stats = ValidationStats {
            total_rules: rules.len(),
            ..Default::default()
        };

        let domains: BTreeSet<&str> = rules
            .iter()
            .filter(|r| !r.is_allow())
            .map(|r| r.domain.as_ref())
            .collect();
        stats.unique_domains = domains.len();

        let mut decisions: BTreeMap<String, bool> = BTreeMap::new();
        let mut pending: Vec<String> = Vec::new();
        for domain in domains {
            match cache.get_or_none(domain) {
                Some(resolvable) if !self.policy.force_refresh => {
                    stats.cache_hits += 1;
                    decisions.insert(domain.to_string(), resolvable);
                }
                _ => pending.push(domain.to_string()),
            }
        }

        info!(
            unique_domains = stats.unique_domains,
            cache_hits = stats.cache_hits,
            pending = pending.len(),
            "Starting DNS validation"
        );

        let batch = self.resolve_pending(pending, &cache).await;

        for (domain, outcome) in batch.resolved {
            stats.resolved += 1;
            match outcome {
                ResolutionOutcome::Resolvable => stats.resolvable += 1,
                ResolutionOutcome::NotFound => stats.not_found += 1,
                ResolutionOutcome::Indeterminate => stats.indeterminate += 1,
            }
            decisions.insert(domain, outcome.keeps_rule());
        }

        stats.timed_out = batch.timed_out.len();
        for domain in batch.timed_out {
            decisions.insert(domain, true);
        }

        let mut report = ValidationReport::default();
        for rule in rules {
            let keep = match rule.polarity {
                Polarity::Allow => {
                    stats.allow_exempt += 1;
                    true
                }
                Polarity::Block => decisions
                    .get(rule.domain.as_ref())
                    .copied()
                    .unwrap_or(true),
            };

            if keep {
                report.kept.push(rule);
            } else {
                debug!(rule = %rule.original_text, "Removing rule for non-existent domain");
                report.removed.push(rule);
            }
        }
        stats.removed = report.removed.len();

        self.flush_cache(&cache).await;

        info!(
            kept = report.kept.len(),
            removed = stats.removed,
            cache_hits = stats.cache_hits,
            resolvable = stats.resolvable,
            not_found = stats.not_found,
            indeterminate = stats.indeterminate,
            timed_out = stats.timed_out,
            "DNS validation complete"
        );

        report.stats = stats;
        report
    }

    async fn load_cache(&self) -> ResolutionCache {
        match self.cache_store.load().await {
            Ok(entries) => {
                info!(entries = entries.len(), "Resolution cache loaded");
                ResolutionCache::from_entries(entries)
            }
            Err(e) => {
                warn!(error = %e, "Resolution cache unreadable; starting empty");
                ResolutionCache::new()
            }
        }
    }

    async fn flush_cache(&self, cache: &ResolutionCache) {
        if !cache.is_dirty() {
            return;
        }

        match self.cache_store.save(&cache.snapshot()).await {
            Ok(()) => info!(entries = cache.len(), "Resolution cache saved"),
            Err(e) => warn!(error = %e, "Failed to save resolution cache"),
        }
    }

    /// Runs `pending` through a fixed pool of workers fed from one queue.
    ///
    /// Only outcomes the collector actually receives are written to `cache`.
    /// Lookups still running when the batch timeout fires are aborted and
    /// reported as timed out; they are not cached.
    async fn resolve_pending(
        &self,
        pending: Vec<String>,
        cache: &ResolutionCache,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            resolved: FxHashMap::default(),
            timed_out: BTreeSet::new(),
        };

        if pending.is_empty() {
            return outcome;
        }

        let (job_tx, job_rx) = mpsc::unbounded_channel::<String>();
        for domain in &pending {
            let _ = job_tx.send(domain.clone());
        }
        drop(job_tx);

        let queue = Arc::new(Mutex::new(job_rx));
        let progress = Arc::new(ValidationProgress::new(
            pending.len(),
            self.policy.progress_interval,
        ));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(String, ResolutionOutcome)>();

        let mut workers = JoinSet::new();
        for _ in 0..self.policy.concurrency.min(pending.len()) {
            let queue = Arc::clone(&queue);
            let resolver = Arc::clone(&self.resolver);
            let servers = Arc::clone(&self.servers);
            let progress = Arc::clone(&progress);
            let result_tx = result_tx.clone();
            let deadline = self.policy.domain_deadline;

            workers.spawn(async move {
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(domain) = next else {
                        break;
                    };

                    let outcome =
                        match tokio::time::timeout(deadline, resolver.resolve(&domain, &servers))
                            .await
                        {
                            Ok(outcome) => outcome,
                            Err(_) => {
                                debug!(domain = %domain, "Per-domain deadline exceeded");
                                ResolutionOutcome::Indeterminate
                            }
                        };

                    progress.record();

                    if result_tx.send((domain, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let batch_deadline = Instant::now() + self.policy.batch_timeout;
        loop {
            match tokio::time::timeout_at(batch_deadline, result_rx.recv()).await {
                Ok(Some((domain, resolved))) => {
                    cache.put(&domain, resolved.keeps_rule());
                    outcome.resolved.insert(domain, resolved);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        outstanding = pending.len() - outcome.resolved.len(),
                        timeout_secs = self.policy.batch_timeout.as_secs(),
                        "Validation batch timed out; keeping unresolved rules"
                    );
                    workers.abort_all();
                    result_rx.close();
                    while let Ok((domain, resolved)) = result_rx.try_recv() {
                        cache.put(&domain, resolved.keeps_rule());
                        outcome.resolved.insert(domain, resolved);
                    }
                    break;
                }
            }
        }

        outcome.timed_out = pending
            .into_iter()
            .filter(|d| !outcome.resolved.contains_key(d))
            .collect();

        outcome
    }
}
