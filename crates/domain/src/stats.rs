/// One `{name: value}` pair from the appliance's top-N lists.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry<T> {
    pub name: String,
    pub value: T,
}

impl<T> TopEntry<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Appliance-wide statistics for its configured statistics interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub num_dns_queries: u64,
    pub num_blocked_filtering: u64,
    pub num_replaced_safebrowsing: u64,
    pub num_replaced_safesearch: u64,
    pub num_replaced_parental: u64,
    /// Seconds.
    pub avg_processing_time: f64,
    pub top_queried_domains: Vec<TopEntry<u64>>,
    pub top_blocked_domains: Vec<TopEntry<u64>>,
    pub top_clients: Vec<TopEntry<u64>>,
    pub top_upstreams_responses: Vec<TopEntry<u64>>,
    /// Seconds.
    pub top_upstreams_avg_time: Vec<TopEntry<f64>>,
}

impl Stats {
    /// Client identifiers from `top_clients`, in the appliance's order.
    pub fn top_client_ids(&self) -> impl Iterator<Item = &str> {
        self.top_clients.iter().map(|entry| entry.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub protection_enabled: bool,
    pub running: bool,
    pub dhcp_available: bool,
    pub version: String,
}
