use crate::ports::AdGuardApi;
use adguard_exporter_domain::{
    ClientLookupRecord, ClientNames, ClientTypeCounts, DomainError, Stats,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Anything keyed by client identifier.
pub trait ClientIdSource: Sync {
    fn client_ids(&self) -> Vec<&str>;
}

impl ClientIdSource for ClientTypeCounts {
    fn client_ids(&self) -> Vec<&str> {
        self.clients().collect()
    }
}

impl ClientIdSource for Stats {
    fn client_ids(&self) -> Vec<&str> {
        self.top_client_ids().collect()
    }
}

/// Resolves client identifiers to the display names configured on the
/// appliance, with one search request per call.
pub struct ClientNameResolver {
    api: Arc<dyn AdGuardApi>,
}

impl ClientNameResolver {
    pub fn new(api: Arc<dyn AdGuardApi>) -> Self {
        Self { api }
    }

    /// Identifiers missing from the result are unknown to the appliance.
    pub async fn resolve(
        &self,
        sources: &[&dyn ClientIdSource],
    ) -> Result<ClientNames, DomainError> {
        let ids = distinct_ids(sources);
        if ids.is_empty() {
            return Ok(ClientNames::new());
        }

        let records = self.api.search_clients(&ids).await?;
        let names = build_name_map(&records);

        debug!(
            server = %self.api.server(),
            requested = ids.len(),
            resolved = names.len(),
            "Client names resolved"
        );
        Ok(names)
    }
}

/// Deduplicated identifiers across every source, sorted.
pub fn distinct_ids(sources: &[&dyn ClientIdSource]) -> Vec<String> {
    sources
        .iter()
        .flat_map(|source| source.client_ids())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Later records overwrite earlier ones for an identifier claimed twice.
pub fn build_name_map(records: &[ClientLookupRecord]) -> ClientNames {
    let mut names = ClientNames::new();
    for record in records {
        for id in &record.info.ids {
            names.insert(id.clone(), record.info.name.clone());
        }
    }
    names
}
