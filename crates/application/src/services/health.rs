use dashmap::DashMap;

/// Liveness/readiness derived from the last poll cycle of every target.
///
/// - ready: every registered target finished at least one cycle
/// - healthy: every registered target's last cycle had no failed fetch
#[derive(Debug, Default)]
pub struct HealthState {
    last_cycle_ok: DashMap<String, Option<bool>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_target(&self, server: &str) {
        self.last_cycle_ok.entry(server.to_string()).or_insert(None);
    }

    pub fn record_cycle(&self, server: &str, ok: bool) {
        self.last_cycle_ok.insert(server.to_string(), Some(ok));
    }

    pub fn is_ready(&self) -> bool {
        !self.last_cycle_ok.is_empty() && self.last_cycle_ok.iter().all(|e| e.value().is_some())
    }

    pub fn is_healthy(&self) -> bool {
        !self.last_cycle_ok.is_empty()
            && self.last_cycle_ok.iter().all(|e| *e.value() == Some(true))
    }
}
