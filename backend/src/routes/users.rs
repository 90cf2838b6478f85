//! User profile API routes

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use habit_tracker_shared::{CreateUserRequest, UpdateProfileRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user).patch(update_user))
}

/// POST /api/v1/users - Create a profile
///
/// Base steps and treadmill goal default to the configured tracker values
/// and cannot be changed afterwards.
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user =
        ProfileService::create_user(state.store(), &state.config().tracker, req, state.today())
            .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id - Get a profile
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = ProfileService::get_user(state.store(), &user_id).await?;
    Ok(Json(user))
}

/// PATCH /api/v1/users/:id - Set height, age or target weight
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = ProfileService::update_profile(state.store(), &user_id, req).await?;
    Ok(Json(user))
}
