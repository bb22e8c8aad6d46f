pub mod http_fetcher;
pub mod local_rule_file;

pub use http_fetcher::HttpRuleFetcher;
pub use local_rule_file::LocalRuleFile;
