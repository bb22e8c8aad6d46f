use std::fmt;

/// Result of resolving one domain against the configured DNS servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionOutcome {
    /// Some server answered with a usable (non-`0.0.0.0`) address.
    Resolvable,
    /// A server answered NXDOMAIN.
    NotFound,
    /// Every server timed out, failed or returned nothing usable.
    Indeterminate,
}

impl ResolutionOutcome {
    /// Whether a block rule for this domain survives validation. Only a
    /// definitive NXDOMAIN removes a rule.
    pub fn keeps_rule(&self) -> bool {
        !matches!(self, ResolutionOutcome::NotFound)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Resolvable => "resolvable",
            ResolutionOutcome::NotFound => "not_found",
            ResolutionOutcome::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
