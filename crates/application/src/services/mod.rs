pub mod client_name_resolver;
pub mod health;
pub mod lease_merger;
pub mod query_log_aggregator;
pub mod record_type_resolver;

pub use client_name_resolver::{ClientIdSource, ClientNameResolver};
pub use health::HealthState;
pub use lease_merger::LeaseMerger;
pub use query_log_aggregator::QueryLogAggregator;
pub use record_type_resolver::RecordTypeResolver;
