#![allow(dead_code)]

use adguard_exporter_application::ports::{
    AdGuardApi, CycleSnapshot, FetchCategory, MetricsReporter,
};
use adguard_exporter_domain::{
    ClientInfo, ClientLookupRecord, DhcpStatus, DomainError, QueryLogEntry, Stats, Status,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockAdGuardApi {
    server: String,
    entries: Arc<RwLock<Vec<QueryLogEntry>>>,
    dhcp: Arc<RwLock<DhcpStatus>>,
    stats: Arc<RwLock<Stats>>,
    status: Arc<RwLock<Status>>,
    clients: Arc<RwLock<Vec<ClientLookupRecord>>>,
    failing: Arc<RwLock<HashSet<FetchCategory>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    search_requests: Arc<Mutex<Vec<Vec<String>>>>,
    query_log_calls: Arc<AtomicU64>,
    search_calls: Arc<AtomicU64>,
}

impl MockAdGuardApi {
    pub fn new(server: &str) -> Self {
        Self {
            server: server.to_string(),
            entries: Arc::new(RwLock::new(Vec::new())),
            dhcp: Arc::new(RwLock::new(DhcpStatus::default())),
            stats: Arc::new(RwLock::new(Stats::default())),
            status: Arc::new(RwLock::new(Status::default())),
            clients: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(None)),
            search_requests: Arc::new(Mutex::new(Vec::new())),
            query_log_calls: Arc::new(AtomicU64::new(0)),
            search_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn set_entries(&self, entries: Vec<QueryLogEntry>) {
        *self.entries.write().await = entries;
    }

    pub async fn set_dhcp(&self, dhcp: DhcpStatus) {
        *self.dhcp.write().await = dhcp;
    }

    pub async fn set_stats(&self, stats: Stats) {
        *self.stats.write().await = stats;
    }

    pub async fn set_status(&self, status: Status) {
        *self.status.write().await = status;
    }

    pub async fn add_client(&self, name: &str, ids: &[&str]) {
        self.clients.write().await.push(ClientLookupRecord {
            lookup_key: ids.first().copied().unwrap_or_default().to_string(),
            info: ClientInfo::new(name, ids.iter().map(|id| id.to_string()).collect()),
        });
    }

    pub async fn set_failing(&self, category: FetchCategory, failing: bool) {
        let mut set = self.failing.write().await;
        if failing {
            set.insert(category);
        } else {
            set.remove(&category);
        }
    }

    /// Every fetch sleeps this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn search_requests(&self) -> Vec<Vec<String>> {
        self.search_requests.lock().unwrap().clone()
    }

    pub fn query_log_calls(&self) -> u64 {
        self.query_log_calls.load(Ordering::Relaxed)
    }

    pub fn search_calls(&self) -> u64 {
        self.search_calls.load(Ordering::Relaxed)
    }

    async fn gate(&self, category: FetchCategory) -> Result<(), DomainError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.read().await.contains(&category) {
            return Err(DomainError::Transport(format!("mock {} failure", category)));
        }
        Ok(())
    }
}

#[async_trait]
impl AdGuardApi for MockAdGuardApi {
    fn server(&self) -> &str {
        &self.server
    }

    async fn fetch_query_log(
        &self,
        limit: u32,
        _response_status: &str,
    ) -> Result<Vec<QueryLogEntry>, DomainError> {
        self.query_log_calls.fetch_add(1, Ordering::Relaxed);
        self.gate(FetchCategory::QueryLog).await?;
        let entries = self.entries.read().await;
        Ok(entries.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_dhcp_status(&self) -> Result<DhcpStatus, DomainError> {
        self.gate(FetchCategory::Dhcp).await?;
        Ok(self.dhcp.read().await.clone())
    }

    async fn search_clients(&self, ids: &[String]) -> Result<Vec<ClientLookupRecord>, DomainError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);
        self.search_requests.lock().unwrap().push(ids.to_vec());
        self.gate(FetchCategory::ClientNames).await?;
        Ok(self.clients.read().await.clone())
    }

    async fn fetch_stats(&self) -> Result<Stats, DomainError> {
        self.gate(FetchCategory::Stats).await?;
        Ok(self.stats.read().await.clone())
    }

    async fn fetch_status(&self) -> Result<Status, DomainError> {
        self.gate(FetchCategory::Status).await?;
        Ok(self.status.read().await.clone())
    }
}

#[derive(Default)]
pub struct MockMetricsReporter {
    published: Mutex<Vec<(String, CycleSnapshot)>>,
}

impl MockMetricsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, CycleSnapshot)> {
        self.published.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<CycleSnapshot> {
        self.published
            .lock()
            .unwrap()
            .last()
            .map(|(_, snapshot)| snapshot.clone())
    }
}

impl MetricsReporter for MockMetricsReporter {
    fn publish(&self, server: &str, snapshot: &CycleSnapshot) {
        self.published
            .lock()
            .unwrap()
            .push((server.to_string(), snapshot.clone()));
    }
}
