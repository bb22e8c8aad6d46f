use ferrous_rules_domain::{
    ConflictKind, ConflictRecord, GeneralizedKey, ParsedRule, Polarity, RuleOrigin,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Final rules (sorted by text) plus the conflicts resolved along the way.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub rules: Vec<ParsedRule>,
    pub conflicts: Vec<ConflictRecord>,
}

impl MergeOutcome {
    pub fn rule_texts(&self) -> Vec<Arc<str>> {
        self.rules.iter().map(|r| r.original_text.clone()).collect()
    }

    pub fn conflict_count(&self, kind: ConflictKind) -> usize {
        self.conflicts.iter().filter(|c| c.kind == kind).count()
    }
}

#[derive(Debug, Default)]
struct RuleGroup {
    allow: Option<ParsedRule>,
    block: Option<ParsedRule>,
    locally_owned: bool,
    shadowed: Vec<ParsedRule>,
}

impl RuleGroup {
    fn slot_mut(&mut self, polarity: Polarity) -> &mut Option<ParsedRule> {
        match polarity {
            Polarity::Allow => &mut self.allow,
            Polarity::Block => &mut self.block,
        }
    }

    /// Local rules always take the slot; later local lines overwrite earlier ones.
    fn offer_local(&mut self, rule: ParsedRule) {
        self.locally_owned = true;
        let polarity = rule.polarity;
        *self.slot_mut(polarity) = Some(rule);
    }

    /// First `$important` rule wins the slot, otherwise the first arrival.
    fn offer_upstream(&mut self, rule: ParsedRule) {
        let slot = self.slot_mut(rule.polarity);
        let replace = match slot.as_ref() {
            None => true,
            Some(current) => !current.has_important && rule.has_important,
        };
        if replace {
            *slot = Some(rule);
        }
    }

    fn resolve(
        self,
        key: &GeneralizedKey,
        conflicts: &mut Vec<ConflictRecord>,
    ) -> Option<ParsedRule> {
        let winner = match (self.allow, self.block) {
            (Some(allow), Some(block)) => {
                conflicts.push(ConflictRecord::new(
                    key.clone(),
                    ConflictKind::PolarityConflict,
                    allow.clone(),
                    vec![block],
                ));
                allow
            }
            (Some(rule), None) | (None, Some(rule)) => rule,
            (None, None) => return None,
        };

        if self.locally_owned {
            let mut losing: Vec<ParsedRule> = Vec::new();
            for rule in self.shadowed {
                let duplicate = rule.original_text == winner.original_text
                    || losing.iter().any(|l| l.original_text == rule.original_text);
                if !duplicate {
                    losing.push(rule);
                }
            }

            if !losing.is_empty() {
                conflicts.push(ConflictRecord::new(
                    key.clone(),
                    ConflictKind::LocalOverride,
                    winner.clone(),
                    losing,
                ));
            }
        }

        Some(winner)
    }
}

/// Groups rules by generalized key and applies the precedence ladder:
/// local over upstream, allow over block, `$important` over plain.
///
/// Pure and deterministic for a given input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleMergeEngine;

impl RuleMergeEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(
        &self,
        local: impl IntoIterator<Item = ParsedRule>,
        upstream: impl IntoIterator<Item = ParsedRule>,
    ) -> MergeOutcome {
        let mut groups: BTreeMap<GeneralizedKey, RuleGroup> = BTreeMap::new();
        let mut local_keys: FxHashSet<GeneralizedKey> = FxHashSet::default();

        for rule in local {
            local_keys.insert(rule.key.clone());
            groups.entry(rule.key.clone()).or_default().offer_local(rule);
        }

        for rule in upstream {
            let group = groups.entry(rule.key.clone()).or_default();
            if local_keys.contains(&rule.key) {
                group.shadowed.push(rule);
            } else {
                group.offer_upstream(rule);
            }
        }

        let mut conflicts = Vec::new();
        let mut rules: Vec<ParsedRule> = groups
            .into_iter()
            .filter_map(|(key, group)| group.resolve(&key, &mut conflicts))
            .collect();

        rules.sort_by(|a, b| a.original_text.cmp(&b.original_text));
        rules.dedup_by(|a, b| a.original_text == b.original_text);

        MergeOutcome { rules, conflicts }
    }

    /// Convenience for callers holding only rule text, e.g. a previous output.
    pub fn merge_texts<'a>(
        &self,
        local: impl IntoIterator<Item = &'a str>,
        upstream: impl IntoIterator<Item = &'a str>,
    ) -> MergeOutcome {
        self.merge(
            local
                .into_iter()
                .filter_map(|l| ParsedRule::parse(l, RuleOrigin::Local)),
            upstream
                .into_iter()
                .filter_map(|l| ParsedRule::parse(l, RuleOrigin::Upstream)),
        )
    }
}
