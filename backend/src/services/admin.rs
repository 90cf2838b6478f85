//! Admin service
//!
//! Builds the cross-user overview. Each user is loaded and summarized in its
//! own task; a user whose data cannot be read is shown with empty maps rather
//! than failing the whole overview.

use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::ProfileService;
use habit_tracker_shared::admin::{user_detail, user_overview, UserSnapshot};
use habit_tracker_shared::{DateKey, UserDetail, UserOverview, UserProfile};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

pub struct AdminService;

impl AdminService {
    /// One card per user, sorted by name
    pub async fn overview(
        store: Arc<dyn Store>,
        today: DateKey,
    ) -> Result<Vec<UserOverview>, ApiError> {
        let profiles = store.list_profiles().await?;
        debug!(users = profiles.len(), "Building admin overview");

        let mut tasks = JoinSet::new();
        for (user_id, profile) in profiles {
            let store = Arc::clone(&store);
            tasks.spawn(async move {
                let snapshot = Self::load_snapshot(store.as_ref(), user_id, profile).await;
                user_overview(&snapshot, today)
            });
        }

        let mut cards = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(card) => cards.push(card),
                Err(e) => error!("Admin overview task failed: {:?}", e),
            }
        }
        cards.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));

        Ok(cards)
    }

    /// Card plus daily and weekly dynamics for one user
    pub async fn user(
        store: &dyn Store,
        user_id: &str,
        weeks: usize,
        today: DateKey,
    ) -> Result<UserDetail, ApiError> {
        let profile = ProfileService::require(store, user_id).await?;
        let snapshot = Self::load_snapshot(store, user_id.to_string(), profile).await;
        Ok(user_detail(&snapshot, weeks, today))
    }

    async fn load_snapshot(store: &dyn Store, user_id: String, profile: UserProfile) -> UserSnapshot {
        let history = store.get_history(&user_id).await.unwrap_or_else(|e| {
            warn!(user_id = %user_id, error = %e, "History unavailable, using empty history");
            Default::default()
        });
        let measurements = store.get_measurements(&user_id).await.unwrap_or_else(|e| {
            warn!(user_id = %user_id, error = %e, "Measurements unavailable, using none");
            Default::default()
        });
        UserSnapshot {
            user_id,
            profile,
            history,
            measurements,
        }
    }
}
