use adguard_exporter_application::ports::{AdGuardApi, MetricsReporter};
use adguard_exporter_application::services::HealthState;
use adguard_exporter_application::use_cases::CollectTargetMetricsUseCase;
use adguard_exporter_domain::Config;
use adguard_exporter_infrastructure::adguard::AdGuardHttpClient;
use adguard_exporter_infrastructure::metrics::PrometheusReporter;
use adguard_exporter_jobs::PollJob;
use std::sync::Arc;
use tracing::info;

/// Shared reporter and health state plus one poll job per target.
pub struct Exporter {
    pub reporter: Arc<PrometheusReporter>,
    pub health: Arc<HealthState>,
    pub poll_jobs: Vec<PollJob>,
}

impl Exporter {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let reporter = Arc::new(PrometheusReporter::new()?);
        let health = Arc::new(HealthState::new());

        let mut poll_jobs = Vec::with_capacity(config.targets.len());
        for target in &config.targets {
            let client = AdGuardHttpClient::new(target, config.polling.request_timeout)?;
            info!(
                server = %target.label(),
                url = %client.base_url(),
                "Target registered"
            );

            let collect = CollectTargetMetricsUseCase::new(
                Arc::new(client) as Arc<dyn AdGuardApi>,
                reporter.clone() as Arc<dyn MetricsReporter>,
            )
            .with_query_log_limit(config.polling.query_log_limit);

            poll_jobs.push(
                PollJob::new(Arc::new(collect), health.clone())
                    .with_interval(config.polling.interval),
            );
        }

        Ok(Self {
            reporter,
            health,
            poll_jobs,
        })
    }
}
