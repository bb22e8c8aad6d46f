use chrono::{DateTime, Utc};
use ferrous_rules_domain::{ConflictKind, ConflictRecord, ParsedRule};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const NOTES: [&str; 6] = [
    "Hosts entries are converted to ||domain^ rules",
    "Numeric-suffixed subdomains are grouped (a36243.example.com -> a*.example.com)",
    "Local rules override every upstream rule for the same group",
    "Allow rules win over block rules; $important wins within a polarity",
    "Block rules whose domain answers NXDOMAIN are removed",
    "Rules are de-duplicated and sorted",
];

pub struct RenderInput<'a> {
    pub rules: &'a [ParsedRule],
    pub conflicts: &'a [ConflictRecord],
    pub generated_at: DateTime<Utc>,
}

/// Assembles the final rule file: header, optional review sections, rules.
#[derive(Debug, Clone)]
pub struct RuleFileRenderer {
    title: String,
    upstream_sources: Vec<String>,
    local_source: String,
    include_review_sections: bool,
}

impl RuleFileRenderer {
    pub fn new(
        title: impl Into<String>,
        upstream_sources: Vec<String>,
        local_source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            upstream_sources,
            local_source: local_source.into(),
            include_review_sections: true,
        }
    }

    pub fn with_review_sections(mut self, enabled: bool) -> Self {
        self.include_review_sections = enabled;
        self
    }

    pub fn render(&self, input: &RenderInput<'_>) -> String {
        let mut out = String::new();
        self.write_header(&mut out, input);

        let reviews = if self.include_review_sections {
            group_reviews(input)
        } else {
            BTreeMap::new()
        };

        if reviews.is_empty() {
            for rule in input.rules {
                let _ = writeln!(out, "{}", rule.original_text);
            }
            return out;
        }

        for kind in [ConflictKind::LocalOverride, ConflictKind::PolarityConflict] {
            let section: Vec<_> = reviews
                .iter()
                .filter(|(_, records)| section_of(records) == kind)
                .collect();
            if section.is_empty() {
                continue;
            }

            let _ = writeln!(
                out,
                "# ===== Human review: {} ({}) =====",
                section_title(kind),
                section.len()
            );
            for (text, records) in section {
                let _ = writeln!(out, "{}", text);
                for record in records {
                    for losing in &record.losing_rules {
                        let _ = writeln!(
                            out,
                            "#   {} {}",
                            annotation(record.kind),
                            losing.original_text
                        );
                    }
                }
            }
            out.push('\n');
        }

        let standard: Vec<_> = input
            .rules
            .iter()
            .filter(|r| !reviews.contains_key(r.original_text.as_ref()))
            .collect();

        let _ = writeln!(out, "# ===== Standard rules ({}) =====", standard.len());
        for rule in standard {
            let _ = writeln!(out, "{}", rule.original_text);
        }

        out
    }

    fn write_header(&self, out: &mut String, input: &RenderInput<'_>) {
        let _ = writeln!(out, "# Title: {}", self.title);
        let _ = writeln!(out, "# Upstream sources:");
        for url in &self.upstream_sources {
            let _ = writeln!(out, "# - {}", url);
        }
        let _ = writeln!(out, "# Local rules: {}", self.local_source);
        let _ = writeln!(out, "# Rule count: {}", input.rules.len());
        let _ = writeln!(
            out,
            "# Last updated: {}",
            input.generated_at.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(out, "# Notes:");
        for (i, note) in NOTES.iter().enumerate() {
            let _ = writeln!(out, "# {}. {}", i + 1, note);
        }
        out.push('\n');
    }
}

/// Conflict records keyed by the winning rule text, limited to winners that
/// survived into the final rule set.
fn group_reviews<'a>(input: &RenderInput<'a>) -> BTreeMap<&'a str, Vec<&'a ConflictRecord>> {
    let present: BTreeSet<&str> = input
        .rules
        .iter()
        .map(|r| r.original_text.as_ref())
        .collect();

    let mut reviews: BTreeMap<&str, Vec<&ConflictRecord>> = BTreeMap::new();
    for record in input.conflicts {
        let text = record.winning_text();
        if present.contains(text) {
            reviews.entry(text).or_default().push(record);
        }
    }

    for records in reviews.values_mut() {
        records.sort_by_key(|r| r.kind);
    }
    reviews
}

fn section_of(records: &[&ConflictRecord]) -> ConflictKind {
    records
        .iter()
        .map(|r| r.kind)
        .min()
        .unwrap_or(ConflictKind::PolarityConflict)
}

fn section_title(kind: ConflictKind) -> &'static str {
    match kind {
        ConflictKind::LocalOverride => "local overrides",
        ConflictKind::PolarityConflict => "allow/block conflicts",
    }
}

fn annotation(kind: ConflictKind) -> &'static str {
    match kind {
        ConflictKind::LocalOverride => "overrides upstream",
        ConflictKind::PolarityConflict => "wins over",
    }
}
