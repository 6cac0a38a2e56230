//! Wire shapes of the AdGuard Home control API.
//!
//! Every list is tolerant of `null` and every scalar of absence; the
//! appliance omits fields freely across versions.

use adguard_exporter_domain::{
    AnswerRecord, ClientInfo, ClientLookupRecord, DhcpStatus, QueryLogEntry, RawLease, Stats,
    Status, TopEntry,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ── /control/querylog ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct QueryLogResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<QueryLogItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryLogItem {
    #[serde(default)]
    pub client: String,
    #[serde(default, rename = "elapsedMs")]
    pub elapsed_ms: String,
    #[serde(default)]
    pub upstream: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answer: Vec<AnswerItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerItem {
    #[serde(default, rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub value: Value,
}

impl From<AnswerItem> for AnswerRecord {
    fn from(item: AnswerItem) -> Self {
        match item.value {
            Value::String(_) => AnswerRecord::PlainType(item.record_type),
            other => AnswerRecord::StructuredRecord(other),
        }
    }
}

impl From<QueryLogItem> for QueryLogEntry {
    fn from(item: QueryLogItem) -> Self {
        QueryLogEntry {
            client: item.client,
            elapsed: item.elapsed_ms,
            upstream: item.upstream,
            answers: item.answer.into_iter().map(AnswerRecord::from).collect(),
        }
    }
}

// ── /control/dhcp/status ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct DhcpStatusResponse {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, alias = "dynamic_leases", deserialize_with = "null_as_empty")]
    pub leases: Vec<RawLease>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub static_leases: Vec<RawLease>,
}

impl From<DhcpStatusResponse> for DhcpStatus {
    fn from(response: DhcpStatusResponse) -> Self {
        DhcpStatus {
            enabled: response.enabled,
            dynamic_leases: response.leases,
            static_leases: response.static_leases,
        }
    }
}

// ── /control/clients/search ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ClientSearchRequest<'a> {
    pub clients: Vec<ClientSearchId<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClientSearchId<'a> {
    pub id: &'a str,
}

impl<'a> ClientSearchRequest<'a> {
    pub fn new(ids: &'a [String]) -> Self {
        Self {
            clients: ids.iter().map(|id| ClientSearchId { id }).collect(),
        }
    }
}

/// `[{lookup_key: {name, ids}}]`; sorted maps keep record order stable.
pub(crate) type ClientSearchResponse = Vec<BTreeMap<String, ClientInfo>>;

pub(crate) fn lookup_records(response: ClientSearchResponse) -> Vec<ClientLookupRecord> {
    response
        .into_iter()
        .flat_map(|object| object.into_iter())
        .map(|(lookup_key, info)| ClientLookupRecord { lookup_key, info })
        .collect()
}

// ── /control/stats ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    #[serde(default)]
    pub num_dns_queries: u64,
    #[serde(default)]
    pub num_blocked_filtering: u64,
    #[serde(default)]
    pub num_replaced_safebrowsing: u64,
    #[serde(default)]
    pub num_replaced_safesearch: u64,
    #[serde(default)]
    pub num_replaced_parental: u64,
    #[serde(default)]
    pub avg_processing_time: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_queried_domains: Vec<BTreeMap<String, u64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_blocked_domains: Vec<BTreeMap<String, u64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_clients: Vec<BTreeMap<String, u64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_upstreams_responses: Vec<BTreeMap<String, u64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_upstreams_avg_time: Vec<BTreeMap<String, f64>>,
}

fn top_entries<T>(list: Vec<BTreeMap<String, T>>) -> Vec<TopEntry<T>> {
    list.into_iter()
        .flat_map(|object| object.into_iter())
        .map(|(name, value)| TopEntry { name, value })
        .collect()
}

impl From<StatsResponse> for Stats {
    fn from(response: StatsResponse) -> Self {
        Stats {
            num_dns_queries: response.num_dns_queries,
            num_blocked_filtering: response.num_blocked_filtering,
            num_replaced_safebrowsing: response.num_replaced_safebrowsing,
            num_replaced_safesearch: response.num_replaced_safesearch,
            num_replaced_parental: response.num_replaced_parental,
            avg_processing_time: response.avg_processing_time,
            top_queried_domains: top_entries(response.top_queried_domains),
            top_blocked_domains: top_entries(response.top_blocked_domains),
            top_clients: top_entries(response.top_clients),
            top_upstreams_responses: top_entries(response.top_upstreams_responses),
            top_upstreams_avg_time: top_entries(response.top_upstreams_avg_time),
        }
    }
}

// ── /control/status ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub protection_enabled: bool,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub dhcp_available: bool,
    #[serde(default)]
    pub version: String,
}

impl From<StatusResponse> for Status {
    fn from(response: StatusResponse) -> Self {
        Status {
            protection_enabled: response.protection_enabled,
            running: response.running,
            dhcp_available: response.dhcp_available,
            version: response.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_value_shape_selects_variant() {
        let item: QueryLogItem = serde_json::from_value(json!({
            "client": "10.0.0.5",
            "elapsedMs": "12.5",
            "upstream": "",
            "answer": [
                {"type": "A", "value": "93.184.216.34", "ttl": 300},
                {"type": "TYPE65", "value": {"Hdr": {"Rrtype": 65}, "Priority": 1}}
            ]
        }))
        .unwrap();

        let entry = QueryLogEntry::from(item);
        assert_eq!(entry.elapsed, "12.5");
        assert_eq!(entry.answers[0], AnswerRecord::PlainType("A".to_string()));
        assert!(matches!(entry.answers[1], AnswerRecord::StructuredRecord(_)));
    }

    #[test]
    fn test_null_answer_list_reads_as_empty() {
        let item: QueryLogItem =
            serde_json::from_value(json!({"client": "x", "elapsedMs": "1", "answer": null}))
                .unwrap();
        assert!(item.answer.is_empty());
    }

    #[test]
    fn test_dhcp_accepts_dynamic_leases_alias() {
        let response: DhcpStatusResponse = serde_json::from_value(json!({
            "enabled": true,
            "dynamic_leases": [{
                "mac": "aa",
                "ip": "192.168.1.10",
                "hostname": "phone",
                "expires": "2026-01-01T00:00:00Z"
            }],
            "static_leases": null
        }))
        .unwrap();

        let status = DhcpStatus::from(response);
        assert_eq!(status.dynamic_leases.len(), 1);
        assert_eq!(
            status.dynamic_leases[0].expires.as_deref(),
            Some("2026-01-01T00:00:00Z")
        );
        assert!(status.static_leases.is_empty());
    }

    #[test]
    fn test_search_request_shape() {
        let ids = vec!["10.0.0.5".to_string(), "aa:bb".to_string()];
        let body = serde_json::to_value(ClientSearchRequest::new(&ids)).unwrap();
        assert_eq!(
            body,
            json!({"clients": [{"id": "10.0.0.5"}, {"id": "aa:bb"}]})
        );
    }

    #[test]
    fn test_search_response_tolerates_null_ids() {
        let response: ClientSearchResponse = serde_json::from_value(json!([
            {"192.168.1.20": {"name": "tv", "ids": null}},
            {"192.168.1.30": {"name": "nas", "ids": ["192.168.1.30"]}}
        ]))
        .unwrap();

        let records = lookup_records(response);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lookup_key, "192.168.1.20");
        assert!(records[0].info.ids.is_empty());
        assert_eq!(records[1].info.ids, vec!["192.168.1.30"]);
    }

    #[test]
    fn test_stats_top_lists_flatten() {
        let response: StatsResponse = serde_json::from_value(json!({
            "num_dns_queries": 120,
            "avg_processing_time": 0.0125,
            "top_clients": [{"10.0.0.5": 80}, {"10.0.0.7": 40}],
            "top_upstreams_avg_time": [{"1.1.1.1:53": 0.02}],
            "top_blocked_domains": null
        }))
        .unwrap();

        let stats = Stats::from(response);
        assert_eq!(stats.num_dns_queries, 120);
        assert_eq!(
            stats.top_clients,
            vec![TopEntry::new("10.0.0.5", 80), TopEntry::new("10.0.0.7", 40)]
        );
        assert_eq!(stats.top_upstreams_avg_time[0].value, 0.02);
        assert!(stats.top_blocked_domains.is_empty());
    }
}
