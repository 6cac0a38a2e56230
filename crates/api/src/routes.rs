use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .route("/healthz", get(handlers::health_check))
        .route("/readyz", get(handlers::readiness_check))
        .with_state(state)
}
