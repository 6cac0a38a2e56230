use dashmap::DashMap;
use std::collections::HashSet;

pub(crate) type LabelValues = Vec<String>;

/// Remembers which label sets each target last published per metric, so
/// series that disappear from a target's data can be removed.
#[derive(Debug, Default)]
pub(crate) struct SeriesTracker {
    live: DashMap<(String, &'static str), HashSet<LabelValues>>,
}

impl SeriesTracker {
    /// Stores `current` and returns the previously live label sets missing
    /// from it.
    pub fn replace(
        &self,
        server: &str,
        metric: &'static str,
        current: HashSet<LabelValues>,
    ) -> Vec<LabelValues> {
        let previous = self
            .live
            .insert((server.to_string(), metric), current.clone())
            .unwrap_or_default();

        previous
            .into_iter()
            .filter(|labels| !current.contains(labels))
            .collect()
    }

    /// Forgets and returns everything live for `(server, metric)`.
    pub fn take(&self, server: &str, metric: &'static str) -> Vec<LabelValues> {
        self.live
            .remove(&(server.to_string(), metric))
            .map(|(_, labels)| labels.into_iter().collect())
            .unwrap_or_default()
    }
}

pub(crate) fn as_refs(labels: &[String]) -> Vec<&str> {
    labels.iter().map(String::as_str).collect()
}
