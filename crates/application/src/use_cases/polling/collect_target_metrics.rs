use crate::ports::{
    AdGuardApi, CycleSnapshot, FetchCategory, MetricsReporter, QUERY_LOG_PAGE_SIZE,
    RESPONSE_STATUS_ALL,
};
use crate::services::{ClientIdSource, ClientNameResolver, LeaseMerger, QueryLogAggregator};
use adguard_exporter_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Use case: one poll cycle against one AdGuard Home instance.
///
/// Fetches run one after another; a failed fetch only drops its own
/// category. Nothing is published until every fetch has finished, so a
/// cycle dropped mid-flight leaves the reporter untouched.
pub struct CollectTargetMetricsUseCase {
    api: Arc<dyn AdGuardApi>,
    reporter: Arc<dyn MetricsReporter>,
    names: ClientNameResolver,
    aggregator: QueryLogAggregator,
    merger: LeaseMerger,
    query_log_limit: u32,
}

impl CollectTargetMetricsUseCase {
    pub fn new(api: Arc<dyn AdGuardApi>, reporter: Arc<dyn MetricsReporter>) -> Self {
        Self {
            names: ClientNameResolver::new(api.clone()),
            api,
            reporter,
            aggregator: QueryLogAggregator::default(),
            merger: LeaseMerger::new(),
            query_log_limit: QUERY_LOG_PAGE_SIZE,
        }
    }

    pub fn with_query_log_limit(mut self, limit: u32) -> Self {
        self.query_log_limit = limit;
        self
    }

    pub fn server(&self) -> &str {
        self.api.server()
    }

    #[instrument(skip(self), fields(server = %self.api.server()))]
    pub async fn execute(&self) -> CycleSnapshot {
        let mut snapshot = CycleSnapshot::default();

        let status = self.api.fetch_status().await;
        snapshot.status = self.track(&mut snapshot, FetchCategory::Status, status);

        let stats = self.api.fetch_stats().await;
        snapshot.stats = self.track(&mut snapshot, FetchCategory::Stats, stats);

        let entries = self
            .api
            .fetch_query_log(self.query_log_limit, RESPONSE_STATUS_ALL)
            .await;
        snapshot.query_log = self
            .track(&mut snapshot, FetchCategory::QueryLog, entries)
            .map(|entries| self.aggregator.aggregate(&entries));

        let dhcp = self.api.fetch_dhcp_status().await;
        snapshot.leases = self
            .track(&mut snapshot, FetchCategory::Dhcp, dhcp)
            .map(|status| self.merger.merge_status(&status));

        let names = {
            let mut sources: Vec<&dyn ClientIdSource> = Vec::with_capacity(2);
            if let Some(log) = &snapshot.query_log {
                sources.push(&log.counts);
            }
            if let Some(stats) = &snapshot.stats {
                sources.push(stats);
            }
            self.names.resolve(&sources).await
        };
        if let Some(names) = self.track(&mut snapshot, FetchCategory::ClientNames, names) {
            snapshot.client_names = names;
        }

        self.reporter.publish(self.api.server(), &snapshot);

        debug!(
            failures = snapshot.failures.len(),
            skipped_answers = snapshot.skipped_answers(),
            skipped_latencies = snapshot.skipped_latencies(),
            "Poll cycle completed"
        );
        snapshot
    }

    fn track<T>(
        &self,
        snapshot: &mut CycleSnapshot,
        category: FetchCategory,
        result: Result<T, DomainError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!(
                    server = %self.api.server(),
                    category = %category,
                    error = %e,
                    "Fetch failed"
                );
                snapshot.failures.push(category);
                None
            }
        }
    }
}
