//! Prometheus exposition endpoint

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse};

/// GET /metrics - Prometheus text format
pub async fn render_metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
