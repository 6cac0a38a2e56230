use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Upstream label used when the appliance answered a query itself.
pub const SELF_UPSTREAM: &str = "self";

/// One DNS answer record as reported by the appliance.
///
/// Most records carry their type as a plain string tag (`"A"`, `"AAAA"`).
/// Records the appliance cannot render (e.g. type-65 HTTPS) arrive as a
/// structured map whose nested header holds the numeric type code.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerRecord {
    PlainType(String),
    StructuredRecord(Value),
}

/// One entry of the appliance query log.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLogEntry {
    pub client: String,
    /// Elapsed milliseconds, still in the appliance's string encoding.
    pub elapsed: String,
    /// Upstream resolver that answered, empty when answered locally.
    pub upstream: String,
    pub answers: Vec<AnswerRecord>,
}

impl QueryLogEntry {
    pub fn new(client: impl Into<String>, elapsed: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            elapsed: elapsed.into(),
            upstream: String::new(),
            answers: Vec::new(),
        }
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = upstream.into();
        self
    }

    pub fn with_answer(mut self, answer: AnswerRecord) -> Self {
        self.answers.push(answer);
        self
    }
}

/// Latency of one query, with the upstream already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTime {
    pub elapsed: Duration,
    pub client: String,
    pub upstream: String,
}

impl QueryTime {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// client identifier -> canonical type tag -> count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTypeCounts {
    counts: HashMap<String, HashMap<String, u64>>,
}

impl ClientTypeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, client: &str, record_type: &str) {
        let per_client = match self.counts.get_mut(client) {
            Some(per_client) => per_client,
            None => self.counts.entry(client.to_string()).or_default(),
        };
        *per_client.entry(record_type.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, client: &str, record_type: &str) -> u64 {
        self.counts
            .get(client)
            .and_then(|types| types.get(record_type))
            .copied()
            .unwrap_or(0)
    }

    pub fn client(&self, client: &str) -> Option<&HashMap<String, u64>> {
        self.counts.get(client)
    }

    pub fn clients(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.counts.iter().flat_map(|(client, types)| {
            types
                .iter()
                .map(move |(record_type, count)| (client.as_str(), record_type.as_str(), *count))
        })
    }

    /// Sum of every count across all clients and types.
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|types| types.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

impl From<HashMap<String, HashMap<String, u64>>> for ClientTypeCounts {
    fn from(counts: HashMap<String, HashMap<String, u64>>) -> Self {
        Self { counts }
    }
}

/// Result of aggregating one query-log page.
#[derive(Debug, Clone, Default)]
pub struct QueryLogSummary {
    pub counts: ClientTypeCounts,
    pub times: Vec<QueryTime>,
    pub skipped_answers: u64,
    pub skipped_latencies: u64,
}
