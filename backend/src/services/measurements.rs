//! Body measurement service

use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::ProfileService;
use crate::telemetry;
use habit_tracker_shared::measurements::{merge, normalize, validate_save, RawMeasurement};
use habit_tracker_shared::{DateKey, MeasurementEntry, Measurements};
use tracing::{info, warn};

pub struct MeasurementService;

impl MeasurementService {
    /// Normalize and store today's measurements
    ///
    /// A second save on the same day is merged onto the stored entry. Nothing
    /// is written when the save is rejected.
    pub async fn save(
        store: &dyn Store,
        user_id: &str,
        date: &str,
        raw: RawMeasurement,
        today: DateKey,
    ) -> Result<MeasurementEntry, ApiError> {
        ProfileService::require(store, user_id).await?;

        let clean = normalize(&raw);
        let entry = match validate_save(date, today, clean) {
            Ok(entry) => entry,
            Err(reason) => {
                metrics::counter!(telemetry::MEASUREMENTS_REJECTED, "reason" => reason.code())
                    .increment(1);
                warn!(user_id, date, reason = reason.code(), "Measurement save rejected");
                return Err(reason.into());
            }
        };

        let existing = store.get_measurement(user_id, entry.date).await?;
        let merged = merge(existing.as_ref(), entry);
        store.put_measurement(user_id, merged.clone()).await?;
        metrics::counter!(telemetry::MEASUREMENTS_SAVED).increment(1);
        info!(user_id, date, merged = existing.is_some(), "Measurements saved");

        Ok(merged)
    }

    pub async fn list(store: &dyn Store, user_id: &str) -> Result<Measurements, ApiError> {
        ProfileService::require(store, user_id).await?;
        Ok(store.get_measurements(user_id).await?)
    }

    pub async fn get(
        store: &dyn Store,
        user_id: &str,
        date: &str,
    ) -> Result<MeasurementEntry, ApiError> {
        ProfileService::require(store, user_id).await?;
        let date: DateKey = date.parse()?;
        store
            .get_measurement(user_id, date)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No measurements on {date}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryStore, ProfileRepository};
    use habit_tracker_shared::measurements::RawNumber;
    use habit_tracker_shared::{MeasurementRejection, UserProfile};

    fn today() -> DateKey {
        "2024-05-10".parse().unwrap()
    }

    async fn store_with_user() -> (InMemoryStore, String) {
        let store = InMemoryStore::new();
        let id = store.create_profile(UserProfile::new("Anna")).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_save_merges_same_day() {
        let (store, id) = store_with_user().await;
        let first = RawMeasurement {
            weight: Some(RawNumber::from("71,2")),
            ..Default::default()
        };
        let second = RawMeasurement {
            waist: Some(RawNumber::from(84.0)),
            ..Default::default()
        };
        MeasurementService::save(&store, &id, "2024-05-10", first, today())
            .await
            .unwrap();
        let merged = MeasurementService::save(&store, &id, "2024-05-10", second, today())
            .await
            .unwrap();

        assert_eq!(merged.values.weight, Some(71.2));
        assert_eq!(merged.values.waist, Some(84.0));
        assert_eq!(MeasurementService::list(&store, &id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_save_writes_nothing() {
        let (store, id) = store_with_user().await;
        let raw = RawMeasurement {
            weight: Some(RawNumber::from(70.0)),
            ..Default::default()
        };
        let result = MeasurementService::save(&store, &id, "2024-05-09", raw, today()).await;
        assert!(matches!(
            result,
            Err(ApiError::Rejected(MeasurementRejection::PastDate))
        ));

        let empty = MeasurementService::save(
            &store,
            &id,
            "2024-05-10",
            RawMeasurement::default(),
            today(),
        )
        .await;
        assert!(matches!(
            empty,
            Err(ApiError::Rejected(MeasurementRejection::Empty))
        ));
        assert!(MeasurementService::list(&store, &id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_day() {
        let (store, id) = store_with_user().await;
        let result = MeasurementService::get(&store, &id, "2024-05-10").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
