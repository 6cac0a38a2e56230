pub mod adguard;
pub mod metrics;
