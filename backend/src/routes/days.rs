//! Daily log API routes

use crate::error::ApiError;
use crate::services::DayService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use habit_tracker_shared::{DailyEntry, DateKey, DayInput, DaySummary, History};
use serde::Deserialize;

/// Optional inclusive date range
#[derive(Debug, Deserialize)]
pub struct DayRangeQuery {
    pub from: Option<DateKey>,
    pub to: Option<DateKey>,
}

/// Create daily log routes
pub fn day_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/days", get(list_days))
        .route("/:id/days/missing", get(missing_days))
        .route("/:id/days/:date", put(save_day))
        .route("/:id/summary", get(summary))
}

/// PUT /api/v1/users/:id/days/:date - Save or overwrite a day
///
/// The stored entry carries the goal assigned for that day.
async fn save_day(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(String, String)>,
    Json(input): Json<DayInput>,
) -> Result<Json<DailyEntry>, ApiError> {
    let entry = DayService::save_day(state.store(), &user_id, &date, input, state.today()).await?;
    Ok(Json(entry))
}

/// GET /api/v1/users/:id/days - Stored entries keyed by date
async fn list_days(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(range): Query<DayRangeQuery>,
) -> Result<Json<History>, ApiError> {
    let days = DayService::list_days(state.store(), &user_id, range.from, range.to).await?;
    Ok(Json(days))
}

/// GET /api/v1/users/:id/days/missing - Unlogged days since the profile was created
async fn missing_days(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<DateKey>>, ApiError> {
    let missing = DayService::missing_days(state.store(), &user_id, state.today()).await?;
    Ok(Json(missing))
}

/// GET /api/v1/users/:id/summary - Today's goal, progress and checklist
async fn summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DaySummary>, ApiError> {
    let summary = DayService::summary(state.store(), &user_id, state.today()).await?;
    Ok(Json(summary))
}
