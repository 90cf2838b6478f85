//! Statistics API routes

use crate::error::ApiError;
use crate::services::stats::{
    BinaryReport, NumericReport, NutritionReport, PeriodQuery, Periods, SleepReport, WaterReport,
};
use crate::services::StatsService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use habit_tracker_shared::{AllTimeStats, BinaryMetric, Metric};

/// Create statistics routes
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/stats/steps", get(steps))
        .route("/:id/stats/binary/:metric", get(binary))
        .route("/:id/stats/water", get(water))
        .route("/:id/stats/nutrition", get(nutrition))
        .route("/:id/stats/sleep", get(sleep))
        .route("/:id/stats/all-time", get(all_time))
}

fn resolve_periods(state: &AppState, query: &PeriodQuery) -> Result<Periods, ApiError> {
    let tracker = &state.config().tracker;
    query.resolve(tracker.history_weeks, tracker.history_months)
}

/// GET /api/v1/users/:id/stats/steps - Step series and buckets
///
/// `?metric=treadmillSteps` (or any other numeric metric) switches the
/// reported metric; the default is total steps.
async fn steps(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<NumericReport>, ApiError> {
    let periods = resolve_periods(&state, &query)?;
    let metric = match query.metric.as_deref() {
        Some(name) => name.parse::<Metric>()?,
        None => Metric::TotalSteps,
    };
    let report =
        StatsService::numeric(state.store(), &user_id, metric, periods, state.today()).await?;
    Ok(Json(report))
}

/// GET /api/v1/users/:id/stats/binary/:metric - Done/total of a habit flag
async fn binary(
    State(state): State<AppState>,
    Path((user_id, metric)): Path<(String, String)>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<BinaryReport>, ApiError> {
    let periods = resolve_periods(&state, &query)?;
    let metric: BinaryMetric = metric.parse()?;
    let report =
        StatsService::binary(state.store(), &user_id, metric, periods, state.today()).await?;
    Ok(Json(report))
}

/// GET /api/v1/users/:id/stats/water
async fn water(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<WaterReport>, ApiError> {
    let periods = resolve_periods(&state, &query)?;
    let report = StatsService::water(state.store(), &user_id, periods, state.today()).await?;
    Ok(Json(report))
}

/// GET /api/v1/users/:id/stats/nutrition
async fn nutrition(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<NutritionReport>, ApiError> {
    let periods = resolve_periods(&state, &query)?;
    let report = StatsService::nutrition(state.store(), &user_id, periods, state.today()).await?;
    Ok(Json(report))
}

/// GET /api/v1/users/:id/stats/sleep
async fn sleep(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<SleepReport>, ApiError> {
    let periods = resolve_periods(&state, &query)?;
    let report = StatsService::sleep(state.store(), &user_id, periods, state.today()).await?;
    Ok(Json(report))
}

/// GET /api/v1/users/:id/stats/all-time - Everything recorded, summarized
async fn all_time(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AllTimeStats>, ApiError> {
    let stats = StatsService::all_time(state.store(), &user_id).await?;
    Ok(Json(stats))
}
