#![allow(dead_code)]

use adguard_exporter_application::ports::{AdGuardApi, CycleSnapshot, MetricsReporter};
use adguard_exporter_domain::{
    AnswerRecord, ClientLookupRecord, DhcpStatus, DomainError, QueryLogEntry, Stats, Status,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockAdGuardApi {
    server: String,
    should_fail: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
    query_log_calls: Arc<AtomicU64>,
}

impl MockAdGuardApi {
    pub fn new(server: &str) -> Self {
        Self {
            server: server.to_string(),
            should_fail: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
            query_log_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn query_log_calls(&self) -> u64 {
        self.query_log_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<(), DomainError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.should_fail.read().await {
            return Err(DomainError::Transport("mock failure".to_string()));
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
        _limit: u32,
        _response_status: &str,
    ) -> Result<Vec<QueryLogEntry>, DomainError> {
        self.query_log_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        Ok(vec![QueryLogEntry::new("10.0.0.5", "1.5")
            .with_answer(AnswerRecord::PlainType("A".to_string()))])
    }

    async fn fetch_dhcp_status(&self) -> Result<DhcpStatus, DomainError> {
        self.gate().await?;
        Ok(DhcpStatus::default())
    }

    async fn search_clients(
        &self,
        _ids: &[String],
    ) -> Result<Vec<ClientLookupRecord>, DomainError> {
        self.gate().await?;
        Ok(Vec::new())
    }

    async fn fetch_stats(&self) -> Result<Stats, DomainError> {
        self.gate().await?;
        Ok(Stats::default())
    }

    async fn fetch_status(&self) -> Result<Status, DomainError> {
        self.gate().await?;
        Ok(Status::default())
    }
}

#[derive(Default)]
pub struct CountingReporter {
    publishes: AtomicUsize,
}

impl CountingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publishes(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }
}

impl MetricsReporter for CountingReporter {
    fn publish(&self, _server: &str, _snapshot: &CycleSnapshot) {
        self.publishes.fetch_add(1, Ordering::SeqCst);
    }
}
