use super::generalized_key::GeneralizedKey;
use super::rule::ParsedRule;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A local rule shadowed one or more upstream rules for the same key.
    LocalOverride,
    /// An allow rule beat a block rule for the same key.
    PolarityConflict,
}

impl ConflictKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            ConflictKind::LocalOverride => "local_override",
            ConflictKind::PolarityConflict => "polarity_conflict",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Report-only record of a resolved conflict. Never feeds back into merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRecord {
    pub key: GeneralizedKey,
    pub kind: ConflictKind,
    pub winning_rule: ParsedRule,
    pub losing_rules: Vec<ParsedRule>,
}

impl ConflictRecord {
    pub fn new(
        key: GeneralizedKey,
        kind: ConflictKind,
        winning_rule: ParsedRule,
        losing_rules: Vec<ParsedRule>,
    ) -> Self {
        Self {
            key,
            kind,
            winning_rule,
            losing_rules,
        }
    }

    pub fn winning_text(&self) -> &str {
        &self.winning_rule.original_text
    }
}
