//! Daily entry service
//!
//! Provides business logic for the daily log:
//! - Saving a day with its goal stamped by the goal engine
//! - Missing-day detection since the profile was created
//! - The "today" summary with progress and checklist

use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::ProfileService;
use crate::telemetry;
use habit_tracker_shared::calendar::format_date;
use habit_tracker_shared::goals::{
    build_entry, daily_checklist, find_missing_days, get_current_goal, goal_progress, StepStatus,
};
use habit_tracker_shared::{DailyEntry, DateKey, DayInput, DaySummary, History};
use tracing::{debug, info};
use validator::Validate;

/// Daily entry service for business logic
pub struct DayService;

impl DayService {
    /// Validate and persist the entry for `date`
    ///
    /// Today and past days may be saved; a past day is a backfill and gets
    /// its goal from the day before it. Future days are refused.
    pub async fn save_day(
        store: &dyn Store,
        user_id: &str,
        date: &str,
        input: DayInput,
        today: DateKey,
    ) -> Result<DailyEntry, ApiError> {
        input.validate()?;
        let date: DateKey = date.parse()?;
        if date > today {
            return Err(ApiError::invalid_field(
                "date",
                "Cannot save a day that has not happened yet",
            ));
        }

        let profile = ProfileService::require(store, user_id).await?;
        let history = store.get_history(user_id).await?;
        let entry = build_entry(date, &input, &profile, &history, today)?;

        store.put_entry(user_id, date, entry.clone()).await?;
        metrics::counter!(telemetry::DAYS_SAVED).increment(1);
        info!(
            user_id,
            date = %date,
            goal = entry.goal,
            steps = entry.total_steps,
            backfill = date < today,
            "Day saved"
        );

        Ok(entry)
    }

    /// Stored entries, optionally limited to `from..=to`
    pub async fn list_days(
        store: &dyn Store,
        user_id: &str,
        from: Option<DateKey>,
        to: Option<DateKey>,
    ) -> Result<History, ApiError> {
        ProfileService::require(store, user_id).await?;
        let history = store.get_history(user_id).await?;
        Ok(history
            .into_iter()
            .filter(|(date, _)| from.map_or(true, |from| *date >= from))
            .filter(|(date, _)| to.map_or(true, |to| *date <= to))
            .collect())
    }

    /// Days since the profile was created that have no entry
    pub async fn missing_days(
        store: &dyn Store,
        user_id: &str,
        today: DateKey,
    ) -> Result<Vec<DateKey>, ApiError> {
        let profile = ProfileService::require(store, user_id).await?;
        let history = store.get_history(user_id).await?;
        let start = profile.created_at.unwrap_or(today);
        Ok(find_missing_days(&history, start, today))
    }

    /// Landing view for `today`
    pub async fn summary(
        store: &dyn Store,
        user_id: &str,
        today: DateKey,
    ) -> Result<DaySummary, ApiError> {
        let profile = ProfileService::require(store, user_id).await?;
        let history = store.get_history(user_id).await?;

        let current_goal = get_current_goal(&profile, &history);
        let entry = history.get(&today).cloned();
        let steps = entry.as_ref().map_or(0, |e| e.total_steps);
        let missing_days =
            find_missing_days(&history, profile.created_at.unwrap_or(today), today);
        debug!(user_id, current_goal, missing = missing_days.len(), "Built day summary");

        Ok(DaySummary {
            today,
            date_label: format_date(today),
            current_goal,
            progress: goal_progress(steps, current_goal),
            status: StepStatus::classify(steps, current_goal),
            checklist: daily_checklist(entry.as_ref()),
            entry,
            missing_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryStore, ProfileRepository};
    use habit_tracker_shared::{Flag, UserProfile};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    async fn store_with_user(created_at: &str) -> (InMemoryStore, String) {
        let store = InMemoryStore::new();
        let mut profile = UserProfile::new("Anna");
        profile.created_at = Some(key(created_at));
        let id = store.create_profile(profile).await.unwrap();
        (store, id)
    }

    fn steps(total_steps: i64) -> DayInput {
        DayInput {
            total_steps,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_goal_follows_previous_day() {
        let (store, id) = store_with_user("2024-05-01").await;
        let day1 = key("2024-05-01");
        let day2 = key("2024-05-02");

        let first = DayService::save_day(&store, &id, "2024-05-01", steps(6000), day1)
            .await
            .unwrap();
        assert_eq!(first.goal, Some(5000));

        // A save for today carries the latest stored goal forward.
        let second = DayService::save_day(&store, &id, "2024-05-02", steps(100), day2)
            .await
            .unwrap();
        assert_eq!(second.goal, Some(5000));

        let summary = DayService::summary(&store, &id, day2).await.unwrap();
        assert_eq!(summary.current_goal, 5000);
        assert_eq!(summary.progress, 2);
    }

    #[tokio::test]
    async fn test_backfill_uses_day_before() {
        let (store, id) = store_with_user("2024-05-01").await;
        let today = key("2024-05-03");
        DayService::save_day(&store, &id, "2024-05-01", steps(6000), key("2024-05-01"))
            .await
            .unwrap();

        let backfilled = DayService::save_day(&store, &id, "2024-05-02", steps(0), today)
            .await
            .unwrap();
        assert_eq!(backfilled.goal, Some(5200));
        assert_eq!(backfilled.morning_exercise, Some(Flag::NotDone));
    }

    #[tokio::test]
    async fn test_future_day_rejected() {
        let (store, id) = store_with_user("2024-05-01").await;
        let result =
            DayService::save_day(&store, &id, "2024-05-04", steps(10), key("2024-05-03")).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_bad_date_rejected() {
        let (store, id) = store_with_user("2024-05-01").await;
        let result =
            DayService::save_day(&store, &id, "03.05.2024", steps(10), key("2024-05-03")).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_days_since_creation() {
        let (store, id) = store_with_user("2024-05-01").await;
        DayService::save_day(&store, &id, "2024-05-02", steps(10), key("2024-05-02"))
            .await
            .unwrap();

        let missing = DayService::missing_days(&store, &id, key("2024-05-04"))
            .await
            .unwrap();
        assert_eq!(missing, vec![key("2024-05-01"), key("2024-05-03")]);
    }

    #[tokio::test]
    async fn test_list_days_range() {
        let (store, id) = store_with_user("2024-05-01").await;
        for day in ["2024-05-01", "2024-05-02", "2024-05-03"] {
            DayService::save_day(&store, &id, day, steps(10), key("2024-05-03"))
                .await
                .unwrap();
        }
        let days = DayService::list_days(&store, &id, Some(key("2024-05-02")), None)
            .await
            .unwrap();
        assert_eq!(days.len(), 2);
    }
}
