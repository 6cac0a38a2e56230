use adguard_exporter_application::ports::MetricsExposition;
use adguard_exporter_application::services::HealthState;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<dyn MetricsExposition>,
    pub health: Arc<HealthState>,
}
