#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
const EXPECTED_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

/// What the fake appliance serves.
#[derive(Clone)]
pub struct ApplianceBehavior {
    pub query_log: Value,
    pub dhcp: Value,
    pub search: Value,
    pub stats: Value,
    pub status: Value,
    /// `(status, body)` returned by `/control/stats` instead of `stats`.
    pub stats_error: Option<(StatusCode, String)>,
    /// Raw body returned by `/control/dhcp/status` instead of `dhcp`.
    pub dhcp_raw: Option<String>,
    pub delay: Option<Duration>,
}

impl Default for ApplianceBehavior {
    fn default() -> Self {
        Self {
            query_log: json!({"data": []}),
            dhcp: json!({"enabled": false, "leases": [], "static_leases": []}),
            search: json!([]),
            stats: json!({}),
            status: json!({}),
            stats_error: None,
            dhcp_raw: None,
            delay: None,
        }
    }
}

#[derive(Default)]
pub struct Recorded {
    pub query_params: Vec<HashMap<String, String>>,
    pub search_bodies: Vec<Value>,
}

struct ApplianceState {
    behavior: ApplianceBehavior,
    recorded: Arc<Mutex<Recorded>>,
}

pub struct MockAppliance {
    addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAppliance {
    pub async fn start(behavior: ApplianceBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let state = Arc::new(ApplianceState {
            behavior,
            recorded: recorded.clone(),
        });

        let router = Router::new()
            .route("/control/querylog", get(query_log))
            .route("/control/dhcp/status", get(dhcp_status))
            .route("/control/clients/search", post(search_clients))
            .route("/control/stats", get(stats))
            .route("/control/status", get(status))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn recorded_query_params(&self) -> Vec<HashMap<String, String>> {
        self.recorded.lock().unwrap().query_params.clone()
    }

    pub fn recorded_search_bodies(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().search_bodies.clone()
    }
}

impl Drop for MockAppliance {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn guard(state: &ApplianceState, headers: &HeaderMap) -> Option<Response> {
    if let Some(delay) = state.behavior.delay {
        tokio::time::sleep(delay).await;
    }
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == EXPECTED_AUTH);
    if authorized {
        None
    } else {
        Some((StatusCode::UNAUTHORIZED, "Unauthorized").into_response())
    }
}

async fn query_log(
    State(state): State<Arc<ApplianceState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = guard(&state, &headers).await {
        return rejection;
    }
    state.recorded.lock().unwrap().query_params.push(params);
    Json(state.behavior.query_log.clone()).into_response()
}

async fn dhcp_status(State(state): State<Arc<ApplianceState>>, headers: HeaderMap) -> Response {
    if let Some(rejection) = guard(&state, &headers).await {
        return rejection;
    }
    match &state.behavior.dhcp_raw {
        Some(raw) => (
            [(header::CONTENT_TYPE, "application/json")],
            raw.clone(),
        )
            .into_response(),
        None => Json(state.behavior.dhcp.clone()).into_response(),
    }
}

async fn search_clients(
    State(state): State<Arc<ApplianceState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = guard(&state, &headers).await {
        return rejection;
    }
    state.recorded.lock().unwrap().search_bodies.push(body);
    Json(state.behavior.search.clone()).into_response()
}

async fn stats(State(state): State<Arc<ApplianceState>>, headers: HeaderMap) -> Response {
    if let Some(rejection) = guard(&state, &headers).await {
        return rejection;
    }
    match &state.behavior.stats_error {
        Some((code, body)) => (*code, body.clone()).into_response(),
        None => Json(state.behavior.stats.clone()).into_response(),
    }
}

async fn status(State(state): State<Arc<ApplianceState>>, headers: HeaderMap) -> Response {
    if let Some(rejection) = guard(&state, &headers).await {
        return rejection;
    }
    Json(state.behavior.status.clone()).into_response()
}
