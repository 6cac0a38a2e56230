use crate::dto::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

fn report(state: &AppState, ok: bool) -> (StatusCode, Json<HealthResponse>) {
    let code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if ok { "ok" } else { "unavailable" }.to_string(),
        ready: state.health.is_ready(),
        healthy: state.health.is_healthy(),
    };
    (code, Json(body))
}

/// 200 while every target's last cycle finished without a failed fetch.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ok = state.health.is_healthy();
    report(&state, ok)
}

/// 200 once every target has finished at least one cycle.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let ok = state.health.is_ready();
    report(&state, ok)
}
