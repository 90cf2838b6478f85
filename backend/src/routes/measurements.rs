//! Body measurement API routes

use crate::error::ApiError;
use crate::services::MeasurementService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use habit_tracker_shared::measurements::RawMeasurement;
use habit_tracker_shared::{MeasurementEntry, Measurements};

/// Create measurement routes
pub fn measurement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/measurements",
            get(list_measurements).put(save_today),
        )
        .route(
            "/:id/measurements/:date",
            get(get_measurement).put(save_measurement),
        )
}

/// PUT /api/v1/users/:id/measurements/:date - Save measurements
///
/// Only today's date is accepted. Numbers may be sent as text with a comma
/// decimal separator.
async fn save_measurement(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(String, String)>,
    Json(raw): Json<RawMeasurement>,
) -> Result<Json<MeasurementEntry>, ApiError> {
    let entry = MeasurementService::save(state.store(), &user_id, &date, raw, state.today()).await?;
    Ok(Json(entry))
}

/// PUT /api/v1/users/:id/measurements - Save measurements for today
async fn save_today(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(raw): Json<RawMeasurement>,
) -> Result<Json<MeasurementEntry>, ApiError> {
    let today = state.today();
    let entry =
        MeasurementService::save(state.store(), &user_id, &today.to_string(), raw, today).await?;
    Ok(Json(entry))
}

/// GET /api/v1/users/:id/measurements - All entries keyed by date
async fn list_measurements(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Measurements>, ApiError> {
    let measurements = MeasurementService::list(state.store(), &user_id).await?;
    Ok(Json(measurements))
}

/// GET /api/v1/users/:id/measurements/:date - One day's entry
async fn get_measurement(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<MeasurementEntry>, ApiError> {
    let entry = MeasurementService::get(state.store(), &user_id, &date).await?;
    Ok(Json(entry))
}
