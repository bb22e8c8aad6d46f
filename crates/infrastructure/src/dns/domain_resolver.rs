//! Resolver adapter used to prune dead block rules.
//!
//! Sends a plain A query to each configured server in turn. The first
//! definitive answer settles the domain: a usable address means
//! `Resolvable`, NXDOMAIN means `NotFound`. Everything else (timeouts,
//! SERVFAIL, empty or sinkholed answers) moves on to the next server, and
//! running out of servers is `Indeterminate`.

use super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::transport::tcp::TcpTransport;
use super::transport::udp::UdpTransport;
use super::transport::DnsTransport;
use async_trait::async_trait;
use ferrous_rules_application::ports::DomainResolver;
use ferrous_rules_domain::{DomainError, ResolutionOutcome};
use hickory_proto::rr::RecordType;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

pub struct HickoryDomainResolver {
    server_timeout: Duration,
}

impl HickoryDomainResolver {
    pub fn new(server_timeout: Duration) -> Self {
        Self { server_timeout }
    }

    /// One A lookup against one server, retried over TCP when the UDP
    /// answer is truncated.
    async fn query_server(
        &self,
        domain: &str,
        server: SocketAddr,
    ) -> Result<DnsResponse, DomainError> {
        let (id, query) = MessageBuilder::build_query_with_id(domain, RecordType::A)?;

        let udp = UdpTransport::new(server);
        let response = Self::exchange(&udp, id, &query, self.server_timeout).await?;
        if !response.truncated {
            return Ok(response);
        }

        debug!(domain = %domain, server = %server, "Truncated UDP response, retrying over TCP");
        let tcp = TcpTransport::new(server);
        Self::exchange(&tcp, id, &query, self.server_timeout).await
    }

    async fn exchange(
        transport: &dyn DnsTransport,
        id: u16,
        query: &[u8],
        timeout: Duration,
    ) -> Result<DnsResponse, DomainError> {
        let raw = transport.send(query, timeout).await?;
        let response = ResponseParser::parse(&raw.bytes)?;

        if response.id != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} response ID mismatch: expected {}, got {}",
                raw.protocol_used, id, response.id
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl DomainResolver for HickoryDomainResolver {
    async fn resolve(&self, domain: &str, servers: &[SocketAddr]) -> ResolutionOutcome {
        for &server in servers {
            match self.query_server(domain, server).await {
                Ok(response) if response.is_nxdomain() => {
                    debug!(domain = %domain, server = %server, "NXDOMAIN");
                    return ResolutionOutcome::NotFound;
                }
                Ok(response) if response.has_usable_address() => {
                    return ResolutionOutcome::Resolvable;
                }
                Ok(response) if response.is_server_error() => {
                    debug!(
                        domain = %domain,
                        server = %server,
                        rcode = ResponseParser::rcode_to_status(response.rcode),
                        "Server error, trying next server"
                    );
                }
                Ok(response) => {
                    debug!(
                        domain = %domain,
                        server = %server,
                        addresses = response.addresses.len(),
                        "No usable answer, trying next server"
                    );
                }
                Err(DomainError::InvalidDomainName(reason)) => {
                    debug!(domain = %domain, reason = %reason, "Domain cannot be queried");
                    return ResolutionOutcome::Indeterminate;
                }
                Err(e) => {
                    debug!(domain = %domain, server = %server, error = %e, "Lookup failed, trying next server");
                }
            }
        }

        ResolutionOutcome::Indeterminate
    }
}
