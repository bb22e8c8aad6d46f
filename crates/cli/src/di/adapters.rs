use ferrous_rules_domain::Config;
use ferrous_rules_infrastructure::cache::JsonFileCacheStore;
use ferrous_rules_infrastructure::dns::HickoryDomainResolver;
use ferrous_rules_infrastructure::output::FileRuleWriter;
use ferrous_rules_infrastructure::sources::{HttpRuleFetcher, LocalRuleFile};
use std::sync::Arc;

pub struct Adapters {
    pub fetcher: Arc<HttpRuleFetcher>,
    pub local_reader: Arc<LocalRuleFile>,
    pub resolver: Arc<HickoryDomainResolver>,
    pub cache_store: Arc<JsonFileCacheStore>,
    pub writer: Arc<FileRuleWriter>,
}

impl Adapters {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: Arc::new(HttpRuleFetcher::from_config(&config.sources)?),
            local_reader: Arc::new(LocalRuleFile::new(config.sources.local_file.clone())),
            resolver: Arc::new(HickoryDomainResolver::new(
                config.validation.server_timeout(),
            )),
            cache_store: Arc::new(JsonFileCacheStore::new(&config.validation.cache_path)),
            writer: Arc::new(FileRuleWriter::new(config.output.path.clone())),
        })
    }
}
