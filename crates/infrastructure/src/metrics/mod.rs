pub mod prometheus_reporter;
mod series_tracker;

pub use prometheus_reporter::PrometheusReporter;
