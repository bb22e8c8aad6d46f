mod domain_resolver;
mod local_rule_reader;
mod resolution_cache_store;
mod rule_file_writer;
mod rule_source_fetcher;

pub use domain_resolver::DomainResolver;
pub use local_rule_reader::LocalRuleReader;
pub use resolution_cache_store::{CacheEntries, ResolutionCacheStore};
pub use rule_file_writer::RuleFileWriter;
pub use rule_source_fetcher::RuleSourceFetcher;

// Re-export for convenience
pub use ferrous_rules_domain::ResolutionOutcome;
