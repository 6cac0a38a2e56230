//! Configuration module for the AdGuard exporter
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `server`: Exporter HTTP binding
//! - `polling`: Poll interval and request limits
//! - `target`: AdGuard Home instances to scrape
//! - `logging`: Logging settings
//! - `duration`: Human-readable duration parsing
//! - `errors`: Configuration errors

pub mod duration;
pub mod errors;
pub mod logging;
pub mod polling;
pub mod root;
pub mod server;
pub mod target;

pub use duration::parse_duration;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use polling::PollingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use target::TargetConfig;
