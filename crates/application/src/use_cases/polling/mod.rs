pub mod collect_target_metrics;

pub use collect_target_metrics::CollectTargetMetricsUseCase;
