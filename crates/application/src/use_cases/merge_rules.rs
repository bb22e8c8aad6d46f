use crate::ports::{LocalRuleReader, RuleSourceFetcher};
use crate::services::{MergeOutcome, RuleMergeEngine};
use ferrous_rules_domain::{ConflictKind, ParsedRule, RawLine, RuleNormalizer};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything the merge phase produced, plus input counts for reporting.
#[derive(Debug, Clone, Default)]
pub struct MergeRun {
    pub local_lines: usize,
    pub upstream_lines: usize,
    pub failed_sources: Vec<String>,
    pub outcome: MergeOutcome,
}

impl MergeRun {
    pub fn is_input_empty(&self) -> bool {
        self.local_lines == 0 && self.upstream_lines == 0
    }
}

pub struct MergeRulesUseCase {
    fetcher: Arc<dyn RuleSourceFetcher>,
    local_reader: Arc<dyn LocalRuleReader>,
    normalizer: RuleNormalizer,
    upstream_urls: Vec<String>,
    engine: RuleMergeEngine,
}

impl MergeRulesUseCase {
    pub fn new(
        fetcher: Arc<dyn RuleSourceFetcher>,
        local_reader: Arc<dyn LocalRuleReader>,
        normalizer: RuleNormalizer,
        upstream_urls: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            local_reader,
            normalizer,
            upstream_urls,
            engine: RuleMergeEngine::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> MergeRun {
        let local_lines = match self.local_reader.read_lines().await {
            Ok(lines) => {
                info!(
                    path = %self.local_reader.location(),
                    count = lines.len(),
                    "Loaded local rules"
                );
                lines
            }
            Err(e) => {
                warn!(
                    path = %self.local_reader.location(),
                    error = %e,
                    "Failed to load local rules; continuing without them"
                );
                vec![]
            }
        };

        info!(count = self.upstream_urls.len(), "Fetching upstream rule sources");
        let (upstream_lines, failed_sources) = self.fetch_upstream().await;

        info!(
            local = local_lines.len(),
            upstream = upstream_lines.len(),
            "Rule input collected"
        );

        let mut run = MergeRun {
            local_lines: local_lines.len(),
            upstream_lines: upstream_lines.len(),
            failed_sources,
            outcome: MergeOutcome::default(),
        };

        if run.is_input_empty() {
            warn!("No rules collected from local file or any upstream source; output will be empty");
        }

        let local = self.parse(local_lines.iter().map(RawLine::local));
        let upstream = self.parse(upstream_lines.iter().map(RawLine::upstream));

        run.outcome = self.engine.merge(local, upstream);

        info!(
            rules = run.outcome.rules.len(),
            local_overrides = run.outcome.conflict_count(ConflictKind::LocalOverride),
            polarity_conflicts = run.outcome.conflict_count(ConflictKind::PolarityConflict),
            "Rules merged"
        );

        run
    }

    /// Sources are fetched concurrently; lines are concatenated in configured
    /// order so upstream arrival order stays stable.
    async fn fetch_upstream(&self) -> (Vec<String>, Vec<String>) {
        let fetches = self
            .upstream_urls
            .iter()
            .map(|url| self.fetcher.fetch_lines(url));
        let results = join_all(fetches).await;

        let mut lines = Vec::new();
        let mut failed = Vec::new();
        for (url, result) in self.upstream_urls.iter().zip(results) {
            match result {
                Ok(source_lines) => {
                    info!(url = %url, count = source_lines.len(), "Fetched rule source");
                    lines.extend(source_lines);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch rule source");
                    failed.push(url.clone());
                }
            }
        }

        (lines, failed)
    }

    fn parse(&self, raw: impl Iterator<Item = RawLine>) -> Vec<ParsedRule> {
        raw.filter_map(|line| self.normalizer.prepare(&line)).collect()
    }
}
