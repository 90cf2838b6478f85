//! In-memory store

use super::{HistoryRepository, MeasurementRepository, ProfileRepository};
use anyhow::Result;
use async_trait::async_trait;
use habit_tracker_shared::{DailyEntry, DateKey, History, MeasurementEntry, Measurements, UserProfile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local storage for all three repositories
///
/// Ids are `user-<n>` with `n` counting up from 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    next_id: AtomicU64,
    profiles: RwLock<HashMap<String, UserProfile>>,
    histories: RwLock<HashMap<String, History>>,
    measurements: RwLock<HashMap<String, Measurements>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn get_history(&self, user_id: &str) -> Result<History> {
        let histories = self.histories.read().await;
        Ok(histories.get(user_id).cloned().unwrap_or_default())
    }

    async fn put_entry(&self, user_id: &str, date: DateKey, entry: DailyEntry) -> Result<()> {
        let mut histories = self.histories.write().await;
        histories
            .entry(user_id.to_string())
            .or_default()
            .insert(date, entry);
        Ok(())
    }
}

#[async_trait]
impl MeasurementRepository for InMemoryStore {
    async fn get_measurements(&self, user_id: &str) -> Result<Measurements> {
        let measurements = self.measurements.read().await;
        Ok(measurements.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_measurement(&self, user_id: &str, date: DateKey) -> Result<Option<MeasurementEntry>> {
        let measurements = self.measurements.read().await;
        Ok(measurements.get(user_id).and_then(|m| m.get(&date)).cloned())
    }

    async fn put_measurement(&self, user_id: &str, entry: MeasurementEntry) -> Result<()> {
        let mut measurements = self.measurements.write().await;
        measurements
            .entry(user_id.to_string())
            .or_default()
            .insert(entry.date, entry);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn create_profile(&self, profile: UserProfile) -> Result<String> {
        let id = format!("user-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.profiles.write().await.insert(id.clone(), profile);
        Ok(id)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn update_profile(&self, user_id: &str, profile: UserProfile) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(user_id) {
            Some(stored) => {
                *stored = profile;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<(String, UserProfile)>> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .iter()
            .map(|(id, profile)| (id.clone(), profile.clone()))
            .collect())
    }
}
