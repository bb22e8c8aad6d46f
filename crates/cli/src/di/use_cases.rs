use super::Adapters;
use ferrous_rules_application::services::RuleFileRenderer;
use ferrous_rules_application::use_cases::{
    GenerateRuleFileUseCase, MergeRulesUseCase, ValidateRulesUseCase, ValidationPolicy,
};
use ferrous_rules_domain::{Config, RuleNormalizer};
use std::sync::Arc;

pub struct UseCases {
    pub generate: Arc<GenerateRuleFileUseCase>,
}

impl UseCases {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let adapters = Adapters::new(config)?;

        let merge = Arc::new(MergeRulesUseCase::new(
            adapters.fetcher,
            adapters.local_reader,
            RuleNormalizer::from_config(&config.filtering),
            config.sources.upstream.clone(),
        ));

        let renderer = RuleFileRenderer::new(
            config.output.title.clone(),
            config.sources.upstream.clone(),
            config.sources.local_file.clone(),
        )
        .with_review_sections(config.output.include_review_sections);

        let mut generate = GenerateRuleFileUseCase::new(merge, renderer, adapters.writer);

        if config.validation.enabled {
            let validate = Arc::new(ValidateRulesUseCase::new(
                adapters.resolver,
                adapters.cache_store,
                config.validation.server_addrs()?,
                ValidationPolicy::from_config(&config.validation),
            ));
            generate = generate.with_validation(validate);
        }

        Ok(Self {
            generate: Arc::new(generate),
        })
    }
}
