mod merge_engine;
mod resolution_cache;
mod rule_file_renderer;

pub use merge_engine::{MergeOutcome, RuleMergeEngine};
pub use resolution_cache::ResolutionCache;
pub use rule_file_renderer::{RenderInput, RuleFileRenderer};
