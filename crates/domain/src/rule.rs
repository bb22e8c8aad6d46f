use super::generalized_key::GeneralizedKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const ALLOW_PREFIX: &str = "@@||";
const BLOCK_PREFIX: &str = "||";
const IMPORTANT_MODIFIER: &str = "$important";

/// Where a rule line came from. Local lines always outrank upstream ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    Local,
    Upstream,
}

impl RuleOrigin {
    pub fn to_str(&self) -> &'static str {
        match self {
            RuleOrigin::Local => "local",
            RuleOrigin::Upstream => "upstream",
        }
    }
}

impl fmt::Display for RuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Block,
    Allow,
}

impl Polarity {
    pub fn to_str(&self) -> &'static str {
        match self {
            Polarity::Block => "block",
            Polarity::Allow => "allow",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A single trimmed input line tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: Arc<str>,
    pub origin: RuleOrigin,
}

impl RawLine {
    pub fn new(text: impl AsRef<str>, origin: RuleOrigin) -> Self {
        Self {
            text: Arc::from(text.as_ref().trim()),
            origin,
        }
    }

    pub fn local(text: impl AsRef<str>) -> Self {
        Self::new(text, RuleOrigin::Local)
    }

    pub fn upstream(text: impl AsRef<str>) -> Self {
        Self::new(text, RuleOrigin::Upstream)
    }
}

/// A recognised block (`||domain^...`) or allow (`@@||domain^...`) rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub polarity: Polarity,
    pub domain: Arc<str>,
    pub has_important: bool,
    pub key: GeneralizedKey,
    pub original_text: Arc<str>,
    pub origin: RuleOrigin,
}

impl ParsedRule {
    /// Parses a normalized line. Anything that is not a domain block or allow
    /// rule yields `None`; heterogeneous sources are full of such lines.
    pub fn parse(line: &str, origin: RuleOrigin) -> Option<Self> {
        let (polarity, rest) = if let Some(rest) = line.strip_prefix(ALLOW_PREFIX) {
            (Polarity::Allow, rest)
        } else if let Some(rest) = line.strip_prefix(BLOCK_PREFIX) {
            (Polarity::Block, rest)
        } else {
            return None;
        };

        let (domain, params) = match rest.find('^') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };

        if !is_rule_domain(domain) {
            return None;
        }

        Some(Self {
            polarity,
            domain: Arc::from(domain),
            has_important: params.contains(IMPORTANT_MODIFIER),
            key: GeneralizedKey::from_domain(domain),
            original_text: Arc::from(line),
            origin,
        })
    }

    pub fn is_allow(&self) -> bool {
        self.polarity == Polarity::Allow
    }
}

/// Matches `[A-Za-z0-9.-]+\.[A-Za-z]+` over the whole input.
pub(crate) fn is_rule_domain(candidate: &str) -> bool {
    if !candidate
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
    {
        return false;
    }

    let Some(dot) = candidate.rfind('.') else {
        return false;
    };

    let (head, tld) = (&candidate[..dot], &candidate[dot + 1..]);
    !head.is_empty() && !tld.is_empty() && tld.bytes().all(|b| b.is_ascii_alphabetic())
}
