//! Habit Tracker Shared Library
//!
//! The pure core of the tracker: calendar arithmetic, the adaptive step goal,
//! sleep calculations, history aggregation and measurement normalization.
//! Nothing here performs I/O or reads global state; callers pass in the
//! snapshots and the current date.

pub mod admin;
pub mod calendar;
pub mod errors;
pub mod goals;
pub mod measurements;
pub mod models;
pub mod sleep;
pub mod stats;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calendar::{DateKey, TimeOfDay};
pub use errors::*;
pub use models::*;
pub use types::*;
