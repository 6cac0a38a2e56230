mod adguard_api;
mod metrics_reporter;

pub use adguard_api::{AdGuardApi, QUERY_LOG_PAGE_SIZE, RESPONSE_STATUS_ALL};
pub use metrics_reporter::{CycleSnapshot, FetchCategory, MetricsExposition, MetricsReporter};
