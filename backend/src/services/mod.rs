//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared tracker core.

pub mod admin;
pub mod days;
pub mod measurements;
pub mod profile;
pub mod stats;

pub use admin::AdminService;
pub use days::DayService;
pub use measurements::MeasurementService;
pub use profile::ProfileService;
pub use stats::StatsService;
