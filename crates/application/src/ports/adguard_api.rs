use adguard_exporter_domain::{
    ClientLookupRecord, DhcpStatus, DomainError, QueryLogEntry, Stats, Status,
};
use async_trait::async_trait;

/// The appliance keeps a rolling buffer; one page of this size is read per cycle.
pub const QUERY_LOG_PAGE_SIZE: u32 = 1000;

/// Include every response status (processed, blocked, filtered, ...).
pub const RESPONSE_STATUS_ALL: &str = "all";

/// Read access to one AdGuard Home instance.
///
/// Every call either yields a fully decoded payload or an error; partial
/// payloads are never returned.
#[async_trait]
pub trait AdGuardApi: Send + Sync {
    /// Label identifying this instance in logs and metrics.
    fn server(&self) -> &str;

    async fn fetch_query_log(
        &self,
        limit: u32,
        response_status: &str,
    ) -> Result<Vec<QueryLogEntry>, DomainError>;

    async fn fetch_dhcp_status(&self) -> Result<DhcpStatus, DomainError>;

    /// One batched lookup of persistent clients by identifier.
    async fn search_clients(&self, ids: &[String]) -> Result<Vec<ClientLookupRecord>, DomainError>;

    async fn fetch_stats(&self) -> Result<Stats, DomainError>;

    async fn fetch_status(&self) -> Result<Status, DomainError>;
}
