//! Admin API routes

use crate::error::ApiError;
use crate::services::stats::PeriodQuery;
use crate::services::AdminService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use habit_tracker_shared::{UserDetail, UserOverview};
use std::sync::Arc;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/users/:id", get(user_detail))
}

/// GET /api/v1/admin/overview - One card per user
async fn overview(State(state): State<AppState>) -> Result<Json<Vec<UserOverview>>, ApiError> {
    let cards = AdminService::overview(Arc::clone(&state.store), state.today()).await?;
    Ok(Json(cards))
}

/// GET /api/v1/admin/users/:id - Drill-down with daily and weekly dynamics
///
/// `?weeks=` sets how many weeks of dynamics to include.
async fn user_detail(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<UserDetail>, ApiError> {
    let tracker = &state.config().tracker;
    let periods = query.resolve(tracker.history_weeks, tracker.history_months)?;
    let detail = AdminService::user(state.store(), &user_id, periods.weeks, state.today()).await?;
    Ok(Json(detail))
}
