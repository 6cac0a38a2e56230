use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

pub async fn get_metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body).into_response())
}
