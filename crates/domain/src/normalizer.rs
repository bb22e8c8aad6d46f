use super::config::FilteringConfig;
use super::rule::{ParsedRule, RawLine};
use std::borrow::Cow;

const HOSTS_ADDRESSES: [&str; 3] = ["0.0.0.0", "127.0.0.1", "::1"];

/// Turns raw source lines into rule syntax the parser understands.
///
/// Comment and invalid-prefix lines are dropped, hosts-file entries are
/// rewritten to `||domain^`, everything else passes through untouched.
#[derive(Debug, Clone)]
pub struct RuleNormalizer {
    excluded_prefixes: Vec<String>,
    supported_rule_types: Vec<String>,
}

impl RuleNormalizer {
    pub fn new(excluded_prefixes: Vec<String>, supported_rule_types: Vec<String>) -> Self {
        Self {
            excluded_prefixes,
            supported_rule_types,
        }
    }

    pub fn from_config(config: &FilteringConfig) -> Self {
        Self::new(
            config.excluded_prefixes.clone(),
            config.supported_rule_types.clone(),
        )
    }

    pub fn normalize<'a>(&self, line: &'a str) -> Option<Cow<'a, str>> {
        let line = line.trim();

        if line.is_empty() || self.is_excluded(line) {
            return None;
        }

        if let Some(domain) = hosts_entry_domain(line) {
            return Some(Cow::Owned(format!("||{}^", domain)));
        }

        Some(Cow::Borrowed(line))
    }

    /// Normalizes, checks the rule-type allowlist and parses in one step.
    pub fn prepare(&self, raw: &RawLine) -> Option<ParsedRule> {
        let normalized = self.normalize(&raw.text)?;

        if !self.is_supported(&normalized) {
            return None;
        }

        ParsedRule::parse(&normalized, raw.origin)
    }

    pub fn is_excluded(&self, line: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    pub fn is_supported(&self, line: &str) -> bool {
        self.supported_rule_types
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }
}

impl Default for RuleNormalizer {
    fn default() -> Self {
        Self::from_config(&FilteringConfig::default())
    }
}

/// Extracts the domain of a `0.0.0.0 domain` / `127.0.0.1 domain` / `::1 domain`
/// line. Trailing text after the domain (inline comments) is ignored.
fn hosts_entry_domain(line: &str) -> Option<&str> {
    let address = HOSTS_ADDRESSES
        .iter()
        .find(|addr| line.starts_with(**addr))?;

    let rest = &line[address.len()..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }

    let run_len = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'-')
        .count();

    longest_domain_prefix(&trimmed[..run_len])
}

/// Longest prefix of `run` that is a valid rule domain.
///
/// `run` is already restricted to `[A-Za-z0-9.-]`, so a prefix qualifies
/// when it has a non-empty head before its last dot and an alphabetic
/// label after it.
fn longest_domain_prefix(run: &str) -> Option<&str> {
    let mut last_dot: Option<usize> = None;
    let mut alphabetic_tail = false;
    let mut end = None;

    for (i, b) in run.bytes().enumerate() {
        if b == b'.' {
            last_dot = Some(i);
            alphabetic_tail = true;
            continue;
        }

        alphabetic_tail &= b.is_ascii_alphabetic();
        if alphabetic_tail && last_dot.is_some_and(|dot| dot > 0) {
            end = Some(i + 1);
        }
    }

    end.map(|end| &run[..end])
}
