use super::record_type_resolver::RecordTypeResolver;
use adguard_exporter_domain::{
    ClientTypeCounts, QueryLogEntry, QueryLogSummary, QueryTime, SELF_UPSTREAM,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Folds one query-log page into per-client type counts and latency records.
///
/// Counting and latency extraction fail independently: an unresolvable
/// answer only drops that answer, an unparsable elapsed value only drops the
/// entry from the latency sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryLogAggregator {
    resolver: RecordTypeResolver,
}

impl QueryLogAggregator {
    pub fn new(resolver: RecordTypeResolver) -> Self {
        Self { resolver }
    }

    pub fn aggregate(&self, entries: &[QueryLogEntry]) -> QueryLogSummary {
        let mut summary = QueryLogSummary {
            counts: ClientTypeCounts::new(),
            times: Vec::with_capacity(entries.len()),
            skipped_answers: 0,
            skipped_latencies: 0,
        };

        for entry in entries {
            for answer in &entry.answers {
                match self.resolver.resolve(answer) {
                    Some(tag) => summary.counts.increment(&entry.client, &tag),
                    None => summary.skipped_answers += 1,
                }
            }

            match parse_elapsed(&entry.elapsed) {
                Some(elapsed) => summary.times.push(QueryTime {
                    elapsed,
                    client: entry.client.clone(),
                    upstream: normalize_upstream(&entry.upstream),
                }),
                None => {
                    warn!(
                        client = %entry.client,
                        elapsed = %entry.elapsed,
                        "Could not parse query elapsed time"
                    );
                    summary.skipped_latencies += 1;
                }
            }
        }

        debug!(
            entries = entries.len(),
            clients = summary.counts.len(),
            counted = summary.counts.total(),
            latencies = summary.times.len(),
            skipped_answers = summary.skipped_answers,
            skipped_latencies = summary.skipped_latencies,
            "Query log aggregated"
        );

        summary
    }
}

/// Elapsed milliseconds as reported by the appliance. `None` for empty,
/// non-numeric, negative or non-finite values.
pub fn parse_elapsed(raw: &str) -> Option<Duration> {
    let ms: f64 = raw.parse().ok()?;
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(ms / 1000.0).ok()
}

pub fn normalize_upstream(upstream: &str) -> String {
    if upstream.is_empty() {
        SELF_UPSTREAM.to_string()
    } else {
        upstream.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elapsed_fractional_ms() {
        assert_eq!(parse_elapsed("12.5"), Some(Duration::from_micros(12_500)));
        assert_eq!(parse_elapsed("0"), Some(Duration::ZERO));
        assert_eq!(parse_elapsed("250"), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_elapsed_rejects_invalid() {
        for raw in ["", "abc", "-1", "-0.5", "NaN", "inf", " 12", "1e400"] {
            assert_eq!(parse_elapsed(raw), None, "raw: {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_upstream() {
        assert_eq!(normalize_upstream(""), "self");
        assert_eq!(normalize_upstream("8.8.8.8"), "8.8.8.8");
        assert_eq!(
            normalize_upstream("https://dns.cloudflare.com/dns-query"),
            "https://dns.cloudflare.com/dns-query"
        );
    }
}
