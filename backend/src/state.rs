//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Injected time**: "today" comes from a [`Clock`], never from the handlers
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Storage behind traits**: handlers reach storage only through [`Store`]

use crate::config::AppConfig;
use crate::repositories::{InMemoryStore, Store};
use habit_tracker_shared::DateKey;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Source of the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> DateKey;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::today()
    }
}

/// A clock stopped on one day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateKey);

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0
    }
}

/// Shared application state
///
/// # Performance
///
/// - `config`, `store`, `clock`: wrapped in Arc, cloning is O(1)
/// - `metrics`: PrometheusHandle is internally Arc'd
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Profiles, histories and measurements
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    /// Prometheus render handle, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
            metrics,
        }
    }

    /// State over an empty in-memory store and the system clock
    pub fn in_memory(config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryStore::new()),
            Arc::new(SystemClock),
            metrics,
        )
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Current calendar day
    #[inline]
    pub fn today(&self) -> DateKey {
        self.clock.today()
    }
}
