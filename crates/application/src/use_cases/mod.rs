pub mod generate_rule_file;
pub mod merge_rules;
pub mod validate_rules;

// Re-export use cases
pub use generate_rule_file::{GenerateRuleFileUseCase, RunSummary};
pub use merge_rules::{MergeRulesUseCase, MergeRun};
pub use validate_rules::{ValidateRulesUseCase, ValidationPolicy, ValidationReport, ValidationStats};
