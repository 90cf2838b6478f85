//! Configuration management for the Habit Tracker backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: HT__)

use anyhow::Result;
use habit_tracker_shared::models::{DEFAULT_BASE_STEPS, DEFAULT_TREADMILL_GOAL};
use habit_tracker_shared::validation::{validate_base_steps, validate_treadmill_goal};
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Tracker defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base steps for profiles created without one
    pub default_base_steps: u32,
    pub default_treadmill_goal: u32,
    /// Weekly buckets returned when the request does not say
    pub history_weeks: usize,
    /// Monthly buckets returned when the request does not say
    pub history_months: usize,
}

/// Prometheus exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_base_steps: DEFAULT_BASE_STEPS,
            default_treadmill_goal: DEFAULT_TREADMILL_GOAL,
            history_weeks: 4,
            history_months: 3,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            tracker: TrackerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with HT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., HT__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("HT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Every problem with the tracker defaults, empty when usable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Err(e) = validate_base_steps(self.tracker.default_base_steps) {
            errors.push(format!("tracker.default_base_steps: {e}"));
        }
        if let Err(e) = validate_treadmill_goal(self.tracker.default_treadmill_goal) {
            errors.push(format!("tracker.default_treadmill_goal: {e}"));
        }
        if self.tracker.history_weeks == 0 || self.tracker.history_months == 0 {
            errors.push("tracker.history_weeks and history_months must be positive".to_string());
        }
        errors
    }
}
