//! Health check endpoints
//!
//! - /health - process is up
//! - /health/ready - the store answers and the metrics exporter state
//! - /health/live - liveness probe, never touches the store

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ReadinessChecks>,
}

impl HealthResponse {
    fn new(status: &'static str, checks: Option<ReadinessChecks>) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessChecks {
    pub store: StoreCheck,
    /// Whether /metrics serves an exposition
    pub metrics_enabled: bool,
}

#[derive(Serialize)]
pub struct StoreCheck {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy", None))
}

/// 503 when listing profiles fails
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = match state.store().list_profiles().await {
        Ok(profiles) => StoreCheck {
            healthy: true,
            profiles: Some(profiles.len()),
            message: None,
        },
        Err(e) => StoreCheck {
            healthy: false,
            profiles: None,
            message: Some(e.to_string()),
        },
    };
    let healthy = store.healthy;
    let checks = ReadinessChecks {
        store,
        metrics_enabled: state.metrics.is_some(),
    };

    if healthy {
        Ok(Json(HealthResponse::new("ready", Some(checks))))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("not_ready", Some(checks))),
        ))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive", None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[tokio::test]
    async fn test_readiness_counts_profiles() {
        let state = AppState::in_memory(AppConfig::default(), None);
        let response = readiness_check(State(state)).await.ok().unwrap();
        assert_eq!(response.status, "ready");

        let checks = response.checks.as_ref().unwrap();
        assert_eq!(checks.store.profiles, Some(0));
        assert!(!checks.metrics_enabled);
    }
}
