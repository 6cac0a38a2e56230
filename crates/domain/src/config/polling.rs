use super::duration::serde_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll loop configuration shared by every target
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Time between two poll cycles of one target (default: 30s)
    #[serde(default = "default_interval", with = "serde_duration")]
    pub interval: Duration,

    /// Per-request timeout against the appliance (default: 10s)
    #[serde(default = "default_request_timeout", with = "serde_duration")]
    pub request_timeout: Duration,

    /// Query log page size (default: 1000)
    #[serde(default = "default_query_log_limit")]
    pub query_log_limit: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            request_timeout: default_request_timeout(),
            query_log_limit: default_query_log_limit(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_query_log_limit() -> u32 {
    1000
}
