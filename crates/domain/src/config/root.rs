use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::filtering::FilteringConfig;
use super::logging::LoggingConfig;
use super::output::OutputConfig;
use super::sources::SourcesConfig;
use super::validation::ValidationConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-rules.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-rules/config.toml";

/// Main configuration structure for Ferrous Rules
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Upstream lists and the local override file
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Line filtering ahead of the parser
    #[serde(default)]
    pub filtering: FilteringConfig,

    /// DNS validation of merged block rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Generated rule file
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-rules.toml in current directory
    /// 3. /etc/ferrous-rules/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(output) = overrides.output_path {
            self.output.path = output;
        }
        if let Some(local) = overrides.local_file {
            self.sources.local_file = local;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.validation.concurrency = concurrency;
        }
        if overrides.no_validate {
            self.validation.enabled = false;
        }
        if overrides.force_refresh {
            self.validation.force_refresh = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filtering.supported_rule_types.is_empty() {
            return Err(ConfigError::Validation(
                "No supported rule types configured".to_string(),
            ));
        }

        if !self.validation.enabled {
            return Ok(());
        }

        if self.validation.dns_servers.is_empty() {
            return Err(ConfigError::Validation(
                "DNS validation is enabled but no dns_servers are configured".to_string(),
            ));
        }

        if self.validation.concurrency == 0 {
            return Err(ConfigError::Validation(
                "validation.concurrency must be greater than 0".to_string(),
            ));
        }

        if self.validation.server_timeout_ms == 0 || self.validation.domain_deadline_ms == 0 {
            return Err(ConfigError::Validation(
                "validation timeouts must be greater than 0".to_string(),
            ));
        }

        self.validation.server_addrs()?;
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(|p| p.to_string())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_path: Option<String>,
    pub local_file: Option<String>,
    pub log_level: Option<String>,
    pub concurrency: Option<usize>,
    pub no_validate: bool,
    pub force_refresh: bool,
}
