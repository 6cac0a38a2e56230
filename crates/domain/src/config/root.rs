use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::polling::PollingConfig;
use super::server::ServerConfig;
use super::target::TargetConfig;

const LOCAL_CONFIG_PATH: &str = "adguard-exporter.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/adguard-exporter/config.toml";

/// Main configuration structure for the AdGuard exporter
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Exporter HTTP server (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Poll loop configuration
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional YAML file holding additional targets
    #[serde(default)]
    pub targets_file: Option<String>,

    /// AdGuard Home instances to scrape
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. adguard-exporter.toml in current directory
    /// 3. /etc/adguard-exporter/config.toml
    /// 4. Default configuration
    ///
    /// CLI overrides are applied afterwards, then the targets file (if any)
    /// is merged in and file-backed secrets are resolved.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.load_targets_file()?;
        config.targets = config
            .targets
            .into_iter()
            .map(TargetConfig::resolve_secrets)
            .collect();
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(interval) = overrides.interval {
            self.polling.interval = interval;
        }
        if let Some(file) = overrides.targets_file {
            self.targets_file = Some(file);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Append the targets listed in `targets_file` (a YAML sequence).
    fn load_targets_file(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.targets_file.as_deref() else {
            return Ok(());
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        let targets = parse_targets_yaml(&contents)
            .map_err(|e| ConfigError::TargetsParse(path.to_string(), e))?;

        self.targets.extend(targets);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::Validation(
                "No targets configured".to_string(),
            ));
        }

        if self.polling.interval.is_zero() {
            return Err(ConfigError::Validation(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.polling.query_log_limit == 0 {
            return Err(ConfigError::Validation(
                "Query log limit must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        let mut labels = HashSet::with_capacity(self.targets.len());
        for (index, target) in self.targets.iter().enumerate() {
            if target.address.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Target #{} has no address",
                    index + 1
                )));
            }
            // The label keys every series and the health entry of a target.
            if !labels.insert(target.label()) {
                return Err(ConfigError::Validation(format!(
                    "Target #{} reuses the server label '{}'",
                    index + 1,
                    target.label()
                )));
            }
        }

        Ok(())
    }
}

pub fn parse_targets_yaml(contents: &str) -> Result<Vec<TargetConfig>, String> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yml::from_str(contents).map_err(|e| e.to_string())
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub interval: Option<Duration>,
    pub targets_file: Option<String>,
    pub log_level: Option<String>,
}
