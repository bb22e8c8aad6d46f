pub mod errors;
pub mod filtering;
pub mod logging;
pub mod output;
pub mod root;
pub mod sources;
pub mod validation;

pub use errors::ConfigError;
pub use filtering::FilteringConfig;
pub use logging::LoggingConfig;
pub use output::OutputConfig;
pub use root::{CliOverrides, Config};
pub use sources::SourcesConfig;
pub use validation::ValidationConfig;
