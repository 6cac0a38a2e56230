//! Prometheus exposition of finished poll cycles.
//!
//! Every series carries a `server` label. A category whose fetch failed in
//! the latest cycle has all of its series for that server removed, and label
//! sets that vanish between cycles (clients, leases, domains) are removed as
//! well.

use super::series_tracker::{as_refs, LabelValues, SeriesTracker};
use adguard_exporter_application::ports::{CycleSnapshot, MetricsExposition, MetricsReporter};
use adguard_exporter_domain::{
    ClientNames, DomainError, LeaseType, MergedLeases, QueryLogSummary, Stats, Status, TopEntry,
};
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

const QUERY_TYPES: &str = "adguard_query_types";
const PROCESSING_TIME: &str = "adguard_query_processing_time_milliseconds";
const UPSTREAM_AVG_RESPONSE_TIME: &str = "adguard_upstream_avg_response_time_milliseconds";
const DHCP_LEASES: &str = "adguard_dhcp_leases";
const DHCP_LEASE_INFO: &str = "adguard_dhcp_lease_info";
const NUM_DNS_QUERIES: &str = "adguard_num_dns_queries";
const NUM_BLOCKED_FILTERING: &str = "adguard_num_blocked_filtering";
const NUM_REPLACED_SAFEBROWSING: &str = "adguard_num_replaced_safebrowsing";
const NUM_REPLACED_SAFESEARCH: &str = "adguard_num_replaced_safesearch";
const NUM_REPLACED_PARENTAL: &str = "adguard_num_replaced_parental";
const AVG_PROCESSING_TIME: &str = "adguard_avg_processing_time_seconds";
const TOP_QUERIED_DOMAINS: &str = "adguard_top_queried_domains";
const TOP_BLOCKED_DOMAINS: &str = "adguard_top_blocked_domains";
const TOP_CLIENTS: &str = "adguard_top_clients";
const TOP_UPSTREAMS: &str = "adguard_top_upstreams";
const TOP_UPSTREAMS_AVG_TIME: &str = "adguard_top_upstreams_avg_time_seconds";
const PROTECTION_ENABLED: &str = "adguard_protection_enabled";
const RUNNING: &str = "adguard_running";
const DHCP_AVAILABLE: &str = "adguard_dhcp_available";
const BUILD_INFO: &str = "adguard_build_info";
const SCRAPE_ERRORS: &str = "adguard_scrape_errors_total";
const DECODE_SKIPS: &str = "adguard_decode_skips_total";

const PROCESSING_TIME_BUCKETS_MS: [f64; 12] = [
    1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
];

type Series = Vec<(LabelValues, f64)>;

/// Owns a private registry; shared between every poll task and `/metrics`.
pub struct PrometheusReporter {
    registry: Registry,
    query_types: GaugeVec,
    processing_time: HistogramVec,
    upstream_avg_response_time: GaugeVec,
    dhcp_leases: GaugeVec,
    dhcp_lease_info: GaugeVec,
    num_dns_queries: GaugeVec,
    num_blocked_filtering: GaugeVec,
    num_replaced_safebrowsing: GaugeVec,
    num_replaced_safesearch: GaugeVec,
    num_replaced_parental: GaugeVec,
    avg_processing_time: GaugeVec,
    top_queried_domains: GaugeVec,
    top_blocked_domains: GaugeVec,
    top_clients: GaugeVec,
    top_upstreams: GaugeVec,
    top_upstreams_avg_time: GaugeVec,
    protection_enabled: GaugeVec,
    running: GaugeVec,
    dhcp_available: GaugeVec,
    build_info: GaugeVec,
    scrape_errors: IntCounterVec,
    decode_skips: IntCounterVec,
    tracker: SeriesTracker,
}

impl PrometheusReporter {
    pub fn new() -> Result<Self, DomainError> {
        let registry = Registry::new();
        let r = &registry;

        Ok(Self {
            query_types: gauge(
                r,
                QUERY_TYPES,
                "Answer records per client and record type in the latest query log window",
                &["server", "client", "client_name", "type"],
            )?,
            processing_time: histogram(
                r,
                PROCESSING_TIME,
                "Query processing time per upstream in the latest query log window",
                &["server", "upstream"],
            )?,
            upstream_avg_response_time: gauge(
                r,
                UPSTREAM_AVG_RESPONSE_TIME,
                "Average query processing time per upstream in the latest query log window",
                &["server", "upstream"],
            )?,
            dhcp_leases: gauge(r, DHCP_LEASES, "DHCP leases by type", &["server", "type"])?,
            dhcp_lease_info: gauge(
                r,
                DHCP_LEASE_INFO,
                "One series per DHCP lease",
                &["server", "type", "ip", "mac", "hostname"],
            )?,
            num_dns_queries: gauge(r, NUM_DNS_QUERIES, "DNS queries processed", &["server"])?,
            num_blocked_filtering: gauge(
                r,
                NUM_BLOCKED_FILTERING,
                "Queries blocked by filter lists",
                &["server"],
            )?,
            num_replaced_safebrowsing: gauge(
                r,
                NUM_REPLACED_SAFEBROWSING,
                "Queries blocked by safe browsing",
                &["server"],
            )?,
            num_replaced_safesearch: gauge(
                r,
                NUM_REPLACED_SAFESEARCH,
                "Queries rewritten by safe search",
                &["server"],
            )?,
            num_replaced_parental: gauge(
                r,
                NUM_REPLACED_PARENTAL,
                "Queries blocked by parental control",
                &["server"],
            )?,
            avg_processing_time: gauge(
                r,
                AVG_PROCESSING_TIME,
                "Average query processing time",
                &["server"],
            )?,
            top_queried_domains: gauge(
                r,
                TOP_QUERIED_DOMAINS,
                "Most queried domains",
                &["server", "domain"],
            )?,
            top_blocked_domains: gauge(
                r,
                TOP_BLOCKED_DOMAINS,
                "Most blocked domains",
                &["server", "domain"],
            )?,
            top_clients: gauge(
                r,
                TOP_CLIENTS,
                "Clients with the most queries",
                &["server", "client", "client_name"],
            )?,
            top_upstreams: gauge(
                r,
                TOP_UPSTREAMS,
                "Responses per upstream",
                &["server", "upstream"],
            )?,
            top_upstreams_avg_time: gauge(
                r,
                TOP_UPSTREAMS_AVG_TIME,
                "Average response time per upstream",
                &["server", "upstream"],
            )?,
            protection_enabled: gauge(
                r,
                PROTECTION_ENABLED,
                "Whether filtering protection is enabled",
                &["server"],
            )?,
            running: gauge(r, RUNNING, "Whether the DNS server is running", &["server"])?,
            dhcp_available: gauge(
                r,
                DHCP_AVAILABLE,
                "Whether the DHCP server is available",
                &["server"],
            )?,
            build_info: gauge(r, BUILD_INFO, "AdGuard Home version", &["server", "version"])?,
            scrape_errors: counter(
                r,
                SCRAPE_ERRORS,
                "Failed fetches by category",
                &["server", "category"],
            )?,
            decode_skips: counter(
                r,
                DECODE_SKIPS,
                "Query log items skipped while decoding",
                &["server", "kind"],
            )?,
            tracker: SeriesTracker::default(),
            registry,
        })
    }

    /// Text exposition of every registered metric.
    pub fn gather_text(&self) -> Result<String, DomainError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| DomainError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| DomainError::Metrics(e.to_string()))
    }

    fn sync_gauge(&self, server: &str, metric: &'static str, gauge: &GaugeVec, series: Series) {
        let mut current = HashSet::with_capacity(series.len());
        for (labels, value) in series {
            gauge.with_label_values(&as_refs(&labels)).set(value);
            current.insert(labels);
        }
        for stale in self.tracker.replace(server, metric, current) {
            let _ = gauge.remove_label_values(&as_refs(&stale));
        }
    }

    fn publish_status(&self, server: &str, status: Option<&Status>) {
        let flag = |value: fn(&Status) -> bool| -> Series {
            status
                .map(|s| vec![(labels(server, &[]), bool_value(value(s)))])
                .unwrap_or_default()
        };

        self.sync_gauge(
            server,
            PROTECTION_ENABLED,
            &self.protection_enabled,
            flag(|s| s.protection_enabled),
        );
        self.sync_gauge(server, RUNNING, &self.running, flag(|s| s.running));
        self.sync_gauge(server, DHCP_AVAILABLE, &self.dhcp_available, flag(|s| s.dhcp_available));

        let build = status
            .map(|s| vec![(labels(server, &[s.version.as_str()]), 1.0)])
            .unwrap_or_default();
        self.sync_gauge(server, BUILD_INFO, &self.build_info, build);
    }

    fn publish_stats(&self, server: &str, stats: Option<&Stats>, names: &ClientNames) {
        let scalar = |value: fn(&Stats) -> f64| -> Series {
            stats
                .map(|s| vec![(labels(server, &[]), value(s))])
                .unwrap_or_default()
        };

        self.sync_gauge(
            server,
            NUM_DNS_QUERIES,
            &self.num_dns_queries,
            scalar(|s| s.num_dns_queries as f64),
        );
        self.sync_gauge(
            server,
            NUM_BLOCKED_FILTERING,
            &self.num_blocked_filtering,
            scalar(|s| s.num_blocked_filtering as f64),
        );
        self.sync_gauge(
            server,
            NUM_REPLACED_SAFEBROWSING,
            &self.num_replaced_safebrowsing,
            scalar(|s| s.num_replaced_safebrowsing as f64),
        );
        self.sync_gauge(
            server,
            NUM_REPLACED_SAFESEARCH,
            &self.num_replaced_safesearch,
            scalar(|s| s.num_replaced_safesearch as f64),
        );
        self.sync_gauge(
            server,
            NUM_REPLACED_PARENTAL,
            &self.num_replaced_parental,
            scalar(|s| s.num_replaced_parental as f64),
        );
        self.sync_gauge(
            server,
            AVG_PROCESSING_TIME,
            &self.avg_processing_time,
            scalar(|s| s.avg_processing_time),
        );

        let top = |list: fn(&Stats) -> &Vec<TopEntry<u64>>| -> Series {
            stats
                .map(|s| top_series(server, list(s), |v| *v as f64))
                .unwrap_or_default()
        };

        self.sync_gauge(
            server,
            TOP_QUERIED_DOMAINS,
            &self.top_queried_domains,
            top(|s| &s.top_queried_domains),
        );
        self.sync_gauge(
            server,
            TOP_BLOCKED_DOMAINS,
            &self.top_blocked_domains,
            top(|s| &s.top_blocked_domains),
        );
        self.sync_gauge(
            server,
            TOP_UPSTREAMS,
            &self.top_upstreams,
            top(|s| &s.top_upstreams_responses),
        );

        let avg_time = stats
            .map(|s| top_series(server, &s.top_upstreams_avg_time, |v| *v))
            .unwrap_or_default();
        self.sync_gauge(server, TOP_UPSTREAMS_AVG_TIME, &self.top_upstreams_avg_time, avg_time);

        let clients = stats
            .map(|s| {
                s.top_clients
                    .iter()
                    .map(|entry| {
                        (
                            labels(server, &[entry.name.as_str(), client_name(names, &entry.name)]),
                            entry.value as f64,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.sync_gauge(server, TOP_CLIENTS, &self.top_clients, clients);
    }

    fn publish_query_log(&self, server: &str, log: Option<&QueryLogSummary>, names: &ClientNames) {
        let counts = log
            .map(|log| {
                log.counts
                    .iter()
                    .map(|(client, record_type, count)| {
                        (
                            labels(server, &[client, client_name(names, client), record_type]),
                            count as f64,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.sync_gauge(server, QUERY_TYPES, &self.query_types, counts);

        // The query log is a sliding window, so each cycle starts a fresh
        // distribution instead of observing overlapping entries twice.
        for stale in self.tracker.take(server, PROCESSING_TIME) {
            let _ = self.processing_time.remove_label_values(&as_refs(&stale));
        }

        let mut per_upstream: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
        if let Some(log) = log {
            for time in &log.times {
                let ms = time.elapsed_ms();
                self.processing_time
                    .with_label_values(&[server, time.upstream.as_str()])
                    .observe(ms);
                let entry = per_upstream.entry(time.upstream.as_str()).or_insert((0.0, 0));
                entry.0 += ms;
                entry.1 += 1;
            }
        }

        let observed = per_upstream
            .keys()
            .map(|upstream| labels(server, &[*upstream]))
            .collect();
        self.tracker.replace(server, PROCESSING_TIME, observed);

        let averages = per_upstream
            .into_iter()
            .map(|(upstream, (sum, n))| (labels(server, &[upstream]), sum / n as f64))
            .collect();
        self.sync_gauge(
            server,
            UPSTREAM_AVG_RESPONSE_TIME,
            &self.upstream_avg_response_time,
            averages,
        );
    }

    fn publish_leases(&self, server: &str, leases: Option<&MergedLeases>) {
        let totals = leases
            .map(|leases| {
                [LeaseType::Dynamic, LeaseType::Static]
                    .into_iter()
                    .map(|t| (labels(server, &[t.as_str()]), leases.count(t) as f64))
                    .collect()
            })
            .unwrap_or_default();
        self.sync_gauge(server, DHCP_LEASES, &self.dhcp_leases, totals);

        let info = leases
            .map(|leases| {
                leases
                    .leases
                    .iter()
                    .map(|lease| {
                        (
                            labels(
                                server,
                                &[
                                    lease.lease_type.as_str(),
                                    lease.ip.as_str(),
                                    lease.mac.as_str(),
                                    lease.hostname.as_str(),
                                ],
                            ),
                            1.0,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.sync_gauge(server, DHCP_LEASE_INFO, &self.dhcp_lease_info, info);
    }
}

impl MetricsReporter for PrometheusReporter {
    fn publish(&self, server: &str, snapshot: &CycleSnapshot) {
        for category in &snapshot.failures {
            self.scrape_errors
                .with_label_values(&[server, category.as_str()])
                .inc();
        }
        if snapshot.skipped_answers() > 0 {
            self.decode_skips
                .with_label_values(&[server, "answer"])
                .inc_by(snapshot.skipped_answers());
        }
        if snapshot.skipped_latencies() > 0 {
            self.decode_skips
                .with_label_values(&[server, "elapsed"])
                .inc_by(snapshot.skipped_latencies());
        }

        self.publish_status(server, snapshot.status.as_ref());
        self.publish_stats(server, snapshot.stats.as_ref(), &snapshot.client_names);
        self.publish_query_log(server, snapshot.query_log.as_ref(), &snapshot.client_names);
        self.publish_leases(server, snapshot.leases.as_ref());

        debug!(server, failures = snapshot.failures.len(), "Metrics published");
    }
}

impl MetricsExposition for PrometheusReporter {
    fn render(&self) -> Result<String, DomainError> {
        self.gather_text()
    }

    fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

fn gauge(
    registry: &Registry,
    name: &str,
    help: &str,
    label_names: &[&str],
) -> Result<GaugeVec, DomainError> {
    let vec = GaugeVec::new(Opts::new(name, help), label_names).map_err(metrics_error)?;
    registry
        .register(Box::new(vec.clone()))
        .map_err(metrics_error)?;
    Ok(vec)
}

fn histogram(
    registry: &Registry,
    name: &str,
    help: &str,
    label_names: &[&str],
) -> Result<HistogramVec, DomainError> {
    let opts = HistogramOpts::new(name, help).buckets(PROCESSING_TIME_BUCKETS_MS.to_vec());
    let vec = HistogramVec::new(opts, label_names).map_err(metrics_error)?;
    registry
        .register(Box::new(vec.clone()))
        .map_err(metrics_error)?;
    Ok(vec)
}

fn counter(
    registry: &Registry,
    name: &str,
    help: &str,
    label_names: &[&str],
) -> Result<IntCounterVec, DomainError> {
    let vec = IntCounterVec::new(Opts::new(name, help), label_names).map_err(metrics_error)?;
    registry
        .register(Box::new(vec.clone()))
        .map_err(metrics_error)?;
    Ok(vec)
}

fn metrics_error(e: prometheus::Error) -> DomainError {
    DomainError::Metrics(e.to_string())
}

fn labels(server: &str, rest: &[&str]) -> LabelValues {
    std::iter::once(server)
        .chain(rest.iter().copied())
        .map(str::to_string)
        .collect()
}

fn top_series<T>(server: &str, entries: &[TopEntry<T>], value: impl Fn(&T) -> f64) -> Series {
    entries
        .iter()
        .map(|entry| (labels(server, &[entry.name.as_str()]), value(&entry.value)))
        .collect()
}

fn client_name<'a>(names: &'a ClientNames, client: &str) -> &'a str {
    names.get(client).map(String::as_str).unwrap_or("")
}

fn bool_value(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
