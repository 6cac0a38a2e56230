use adguard_exporter_application::services::HealthState;
use adguard_exporter_application::use_cases::CollectTargetMetricsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Polls one AdGuard Home instance on a fixed interval.
///
/// The first cycle runs immediately. A cycle in flight when the token is
/// cancelled is dropped before it publishes.
pub struct PollJob {
    collect: Arc<CollectTargetMetricsUseCase>,
    health: Arc<HealthState>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl PollJob {
    pub fn new(collect: Arc<CollectTargetMetricsUseCase>, health: Arc<HealthState>) -> Self {
        health.register_target(collect.server());
        Self {
            collect,
            health,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn server(&self) -> &str {
        self.collect.server()
    }

    pub async fn start(self: Arc<Self>) {
        let server = self.server();
        info!(server, interval_ms = self.interval.as_millis() as u64, "Starting poll job");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!(server, "PollJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => {
                            info!(server, "PollJob: cycle aborted by shutdown");
                            break;
                        }
                        snapshot = self.collect.execute() => {
                            let complete = snapshot.is_complete();
                            self.health.record_cycle(server, complete);
                            if !complete {
                                let failed: Vec<&str> =
                                    snapshot.failures.iter().map(|c| c.as_str()).collect();
                                warn!(
                                    server,
                                    failed = ?failed,
                                    "Poll cycle finished with failures"
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
