pub mod domain_resolver;
pub mod forwarding;
pub mod transport;

pub use domain_resolver::HickoryDomainResolver;
