//! HTTP surface
//!
//! Probes and `/metrics` sit at the root; tracker resources live under `/api/v1`,
//! with every per-user resource nested below `/users/:id`.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod days;
mod health;
mod measurements;
mod prometheus;
mod stats;
mod users;

pub use admin::admin_routes;
pub use days::day_routes;
pub use measurements::measurement_routes;
pub use stats::stats_routes;
pub use users::user_routes;

/// Full router, state applied and request tracing outermost
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(prometheus::render_metrics))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Habit Tracker API v1" }))
        .nest(
            "/users",
            user_routes()
                .merge(day_routes())
                .merge(measurement_routes())
                .merge(stats_routes()),
        )
        .nest("/admin", admin_routes())
}
