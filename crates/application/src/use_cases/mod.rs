pub mod polling;

// Re-export use cases
pub use polling::CollectTargetMetricsUseCase;
