use super::merge_rules::MergeRulesUseCase;
use super::validate_rules::{ValidateRulesUseCase, ValidationStats};
use crate::ports::RuleFileWriter;
use crate::services::{RenderInput, RuleFileRenderer};
use chrono::{DateTime, Utc};
use ferrous_rules_domain::{ConflictKind, DomainError};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub local_lines: usize,
    pub upstream_lines: usize,
    pub failed_sources: usize,
    pub merged_rules: usize,
    pub local_overrides: usize,
    pub polarity_conflicts: usize,
    pub validation: Option<ValidationStats>,
    pub final_rules: usize,
}

/// Full pipeline: merge, optionally validate, render, write.
pub struct GenerateRuleFileUseCase {
    merge: Arc<MergeRulesUseCase>,
    validate: Option<Arc<ValidateRulesUseCase>>,
    renderer: RuleFileRenderer,
    writer: Arc<dyn RuleFileWriter>,
}

impl GenerateRuleFileUseCase {
    pub fn new(
        merge: Arc<MergeRulesUseCase>,
        renderer: RuleFileRenderer,
        writer: Arc<dyn RuleFileWriter>,
    ) -> Self {
        Self {
            merge,
            validate: None,
            renderer,
            writer,
        }
    }

    pub fn with_validation(mut self, validate: Arc<ValidateRulesUseCase>) -> Self {
        self.validate = Some(validate);
        self
    }

    pub async fn execute(&self) -> Result<RunSummary, DomainError> {
        self.execute_at(Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn execute_at(&self, generated_at: DateTime<Utc>) -> Result<RunSummary, DomainError> {
        let run = self.merge.execute().await;

        let mut summary = RunSummary {
            local_lines: run.local_lines,
            upstream_lines: run.upstream_lines,
            failed_sources: run.failed_sources.len(),
            merged_rules: run.outcome.rules.len(),
            local_overrides: run.outcome.conflict_count(ConflictKind::LocalOverride),
            polarity_conflicts: run.outcome.conflict_count(ConflictKind::PolarityConflict),
            ..Default::default()
        };

        let rules = match &self.validate {
            Some(validate) => {
                let report = validate.execute(run.outcome.rules.clone()).await;
                summary.validation = Some(report.stats);
                report.kept
            }
            None => {
                info!("DNS validation disabled");
                run.outcome.rules.clone()
            }
        };
        summary.final_rules = rules.len();

        let body = self.renderer.render(&RenderInput {
            rules: &rules,
            conflicts: &run.outcome.conflicts,
            generated_at,
        });

        self.writer.write(&body).await?;

        info!(
            path = %self.writer.location(),
            rules = summary.final_rules,
            "Rule file written"
        );

        Ok(summary)
    }
}
