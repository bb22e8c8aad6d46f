//! Ferrous Rules Domain Layer
pub mod config;
pub mod conflict;
pub mod errors;
pub mod generalized_key;
pub mod normalizer;
pub mod resolution;
pub mod rule;

pub use config::{CliOverrides, Config, ConfigError};
pub use conflict::{ConflictKind, ConflictRecord};
pub use errors::DomainError;
pub use generalized_key::GeneralizedKey;
pub use normalizer::RuleNormalizer;
pub use resolution::ResolutionOutcome;
pub use rule::{ParsedRule, Polarity, RawLine, RuleOrigin};
