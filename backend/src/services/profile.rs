//! User profile service

use crate::config::TrackerConfig;
use crate::error::ApiError;
use crate::repositories::Store;
use habit_tracker_shared::validation::{validate_base_steps, validate_treadmill_goal};
use habit_tracker_shared::{CreateUserRequest, DateKey, UpdateProfileRequest, UserProfile, UserResponse};
use tracing::info;
use validator::Validate;

/// Profile service for business logic
pub struct ProfileService;

impl ProfileService {
    /// Create a profile; missing step settings fall back to the tracker defaults
    ///
    /// Tracking starts on `today`, which is where missing-day detection begins.
    pub async fn create_user(
        store: &dyn Store,
        defaults: &TrackerConfig,
        req: CreateUserRequest,
        today: DateKey,
    ) -> Result<UserResponse, ApiError> {
        req.validate()?;

        let base_steps = req.base_steps.unwrap_or(defaults.default_base_steps);
        validate_base_steps(base_steps).map_err(|e| ApiError::invalid_field("baseSteps", e))?;
        let treadmill_goal = req.treadmill_goal.unwrap_or(defaults.default_treadmill_goal);
        validate_treadmill_goal(treadmill_goal)
            .map_err(|e| ApiError::invalid_field("treadmillGoal", e))?;

        let profile = UserProfile {
            name: req.name.trim().to_string(),
            base_steps,
            treadmill_goal,
            height: req.height,
            age: req.age,
            target_weight: req.target_weight,
            created_at: Some(today),
        };
        let id = store.create_profile(profile.clone()).await?;
        info!(user_id = %id, base_steps, "User profile created");

        Ok(UserResponse { id, profile })
    }

    /// Load a profile or fail with `NotFound`
    pub async fn require(store: &dyn Store, user_id: &str) -> Result<UserProfile, ApiError> {
        store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))
    }

    pub async fn get_user(store: &dyn Store, user_id: &str) -> Result<UserResponse, ApiError> {
        let profile = Self::require(store, user_id).await?;
        Ok(UserResponse {
            id: user_id.to_string(),
            profile,
        })
    }

    /// Patch the one-time fields; absent fields keep their stored value
    pub async fn update_profile(
        store: &dyn Store,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        req.validate()?;

        let mut profile = Self::require(store, user_id).await?;
        if let Some(height) = req.height {
            profile.height = Some(height);
        }
        if let Some(age) = req.age {
            profile.age = Some(age);
        }
        if let Some(target_weight) = req.target_weight {
            profile.target_weight = Some(target_weight);
        }

        if !store.update_profile(user_id, profile.clone()).await? {
            return Err(ApiError::NotFound(format!("User {user_id} not found")));
        }
        info!(user_id, "User profile updated");

        Ok(UserResponse {
            id: user_id.to_string(),
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;

    fn request(name: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            base_steps: None,
            treadmill_goal: None,
            height: None,
            age: None,
            target_weight: None,
        }
    }

    fn today() -> DateKey {
        "2024-05-10".parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_uses_defaults() {
        let store = InMemoryStore::new();
        let user = ProfileService::create_user(&store, &TrackerConfig::default(), request(" Anna "), today())
            .await
            .unwrap();
        assert_eq!(user.profile.name, "Anna");
        assert_eq!(user.profile.base_steps, 5000);
        assert_eq!(user.profile.treadmill_goal, 3000);
        assert_eq!(user.profile.created_at, Some(today()));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let store = InMemoryStore::new();
        let result =
            ProfileService::create_user(&store, &TrackerConfig::default(), request(""), today()).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_step_settings() {
        let store = InMemoryStore::new();
        let mut req = request("Boris");
        req.base_steps = Some(7000);
        let user = ProfileService::create_user(&store, &TrackerConfig::default(), req, today())
            .await
            .unwrap();

        let update = UpdateProfileRequest {
            height: Some(181.0),
            ..Default::default()
        };
        let updated = ProfileService::update_profile(&store, &user.id, update)
            .await
            .unwrap();
        assert_eq!(updated.profile.height, Some(181.0));
        assert_eq!(updated.profile.base_steps, 7000);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = InMemoryStore::new();
        let result = ProfileService::get_user(&store, "user-42").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
