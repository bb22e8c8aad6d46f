use async_trait::async_trait;
use ferrous_rules_domain::ResolutionOutcome;
use std::net::SocketAddr;

#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Resolve `domain` against `servers`, tried in order.
    ///
    /// Never fails: transport trouble is reported as
    /// [`ResolutionOutcome::Indeterminate`].
    async fn resolve(&self, domain: &str, servers: &[SocketAddr]) -> ResolutionOutcome;
}
