//! HTTP client for one AdGuard Home instance.
//!
//! Every call carries HTTP basic auth and is bounded by the client-wide
//! request timeout. Non-2xx responses surface as `UnexpectedStatus` with the
//! response body attached; malformed JSON surfaces as `Decode`.

use super::dto::{
    lookup_records, ClientSearchRequest, ClientSearchResponse, DhcpStatusResponse,
    QueryLogResponse, StatsResponse, StatusResponse,
};
use adguard_exporter_application::ports::AdGuardApi;
use adguard_exporter_domain::{
    ClientLookupRecord, DhcpStatus, DomainError, QueryLogEntry, Stats, Status, TargetConfig,
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const QUERY_LOG_PATH: &str = "/control/querylog";
const DHCP_STATUS_PATH: &str = "/control/dhcp/status";
const CLIENT_SEARCH_PATH: &str = "/control/clients/search";
const STATS_PATH: &str = "/control/stats";
const STATUS_PATH: &str = "/control/status";

const USER_AGENT: &str = concat!("adguard-exporter/", env!("CARGO_PKG_VERSION"));

pub struct AdGuardHttpClient {
    http: reqwest::Client,
    server: String,
    base_url: String,
    username: String,
    password: String,
}

impl AdGuardHttpClient {
    pub fn new(target: &TargetConfig, timeout: Duration) -> Result<Self, DomainError> {
        if target.address.trim().is_empty() {
            return Err(DomainError::InvalidTarget("empty address".to_string()));
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| DomainError::InvalidTarget(format!("{}: {}", target.address, e)))?;

        Ok(Self {
            http,
            server: target.label().to_string(),
            base_url: target.base_url(),
            username: target.username.clone(),
            password: target.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, DomainError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| self.request_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.request_error(path, e))?;

        debug!(server = %self.server, path, bytes = bytes.len(), "AdGuard response received");

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::Decode(format!("{} from {}: {}", path, self.server, e)))
    }

    fn request_error(&self, path: &str, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::Timeout(format!("{} on {}", path, self.server))
        } else {
            DomainError::Transport(format!("{} on {}: {}", path, self.server, e))
        }
    }
}

#[async_trait]
impl AdGuardApi for AdGuardHttpClient {
    fn server(&self) -> &str {
        &self.server
    }

    async fn fetch_query_log(
        &self,
        limit: u32,
        response_status: &str,
    ) -> Result<Vec<QueryLogEntry>, DomainError> {
        let query = [
            ("limit", limit.to_string()),
            ("response_status", response_status.to_string()),
        ];
        let response: QueryLogResponse = self.get(QUERY_LOG_PATH, &query).await?;
        Ok(response.data.into_iter().map(QueryLogEntry::from).collect())
    }

    async fn fetch_dhcp_status(&self) -> Result<DhcpStatus, DomainError> {
        let response: DhcpStatusResponse = self.get(DHCP_STATUS_PATH, &[]).await?;
        Ok(response.into())
    }

    async fn search_clients(&self, ids: &[String]) -> Result<Vec<ClientLookupRecord>, DomainError> {
        let request = self
            .http
            .post(self.url(CLIENT_SEARCH_PATH))
            .json(&ClientSearchRequest::new(ids));
        let response: ClientSearchResponse = self.send(CLIENT_SEARCH_PATH, request).await?;
        Ok(lookup_records(response))
    }

    async fn fetch_stats(&self) -> Result<Stats, DomainError> {
        let response: StatsResponse = self.get(STATS_PATH, &[]).await?;
        Ok(response.into())
    }

    async fn fetch_status(&self) -> Result<Status, DomainError> {
        let response: StatusResponse = self.get(STATUS_PATH, &[]).await?;
        Ok(response.into())
    }
}
