//! Storage contracts
//!
//! Services only see these traits. The in-memory store backs the binary and
//! the tests; a database-backed store would implement the same traits.

use anyhow::Result;
use async_trait::async_trait;
use habit_tracker_shared::{DailyEntry, DateKey, History, MeasurementEntry, Measurements, UserProfile};

pub mod memory;

pub use memory::InMemoryStore;

/// Daily entries keyed by date, per user
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Full history of a user; empty when nothing was recorded
    async fn get_history(&self, user_id: &str) -> Result<History>;

    /// Insert or replace the entry for `date`
    async fn put_entry(&self, user_id: &str, date: DateKey, entry: DailyEntry) -> Result<()>;
}

/// Body measurements keyed by date, per user
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    async fn get_measurements(&self, user_id: &str) -> Result<Measurements>;

    async fn get_measurement(&self, user_id: &str, date: DateKey) -> Result<Option<MeasurementEntry>>;

    /// Insert or replace the entry stored under `entry.date`
    async fn put_measurement(&self, user_id: &str, entry: MeasurementEntry) -> Result<()>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Store a new profile and return its id
    async fn create_profile(&self, profile: UserProfile) -> Result<String>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Replace a stored profile; returns false when the id is unknown
    async fn update_profile(&self, user_id: &str, profile: UserProfile) -> Result<bool>;

    /// Every profile with its id
    async fn list_profiles(&self) -> Result<Vec<(String, UserProfile)>>;
}

/// Everything a service needs from storage
pub trait Store: HistoryRepository + MeasurementRepository + ProfileRepository {}

impl<T> Store for T where T: HistoryRepository + MeasurementRepository + ProfileRepository {}
