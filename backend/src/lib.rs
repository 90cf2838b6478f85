//! Habit tracker service
//!
//! Storage providers, services over the shared core and the axum router.
//! The binary in `main.rs` only wires configuration, tracing and the listener.

pub mod config;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
