//! AdGuard Exporter Domain Layer
pub mod client;
pub mod config;
pub mod dhcp;
pub mod errors;
pub mod query_log;
pub mod stats;

pub use client::{ClientInfo, ClientLookupRecord, ClientNames};
pub use config::{CliOverrides, Config, ConfigError, TargetConfig};
pub use dhcp::{DhcpStatus, Lease, LeaseType, MergedLeases, RawLease};
pub use errors::DomainError;
pub use query_log::{
    AnswerRecord, ClientTypeCounts, QueryLogEntry, QueryLogSummary, QueryTime, SELF_UPSTREAM,
};
pub use stats::{Stats, Status, TopEntry};
