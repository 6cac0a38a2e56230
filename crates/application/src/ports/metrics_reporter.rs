use adguard_exporter_domain::{
    ClientNames, DomainError, MergedLeases, QueryLogSummary, Stats, Status,
};
use std::fmt;

/// The fetch a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchCategory {
    Status,
    Stats,
    QueryLog,
    Dhcp,
    ClientNames,
}

impl FetchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchCategory::Status => "status",
            FetchCategory::Stats => "stats",
            FetchCategory::QueryLog => "querylog",
            FetchCategory::Dhcp => "dhcp",
            FetchCategory::ClientNames => "clients",
        }
    }
}

impl fmt::Display for FetchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one poll cycle produced for one target.
///
/// A category is `None` when its fetch failed; the failure is listed in
/// `failures` instead.
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    pub status: Option<Status>,
    pub stats: Option<Stats>,
    pub query_log: Option<QueryLogSummary>,
    pub leases: Option<MergedLeases>,
    pub client_names: ClientNames,
    pub failures: Vec<FetchCategory>,
}

impl CycleSnapshot {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn skipped_answers(&self) -> u64 {
        self.query_log.as_ref().map_or(0, |log| log.skipped_answers)
    }

    pub fn skipped_latencies(&self) -> u64 {
        self.query_log.as_ref().map_or(0, |log| log.skipped_latencies)
    }
}

/// Sink for finished cycles.
///
/// Implementations are shared by every target's poll task and must accept
/// concurrent calls; series are keyed by `server` so targets never merge.
pub trait MetricsReporter: Send + Sync {
    fn publish(&self, server: &str, snapshot: &CycleSnapshot);
}

/// Renders everything published so far in an exposition format.
pub trait MetricsExposition: Send + Sync {
    fn render(&self) -> Result<String, DomainError>;
    fn content_type(&self) -> &'static str;
}
