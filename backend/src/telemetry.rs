//! Prometheus metrics
//!
//! Counter names live here so services and tests agree on them.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const DAYS_SAVED: &str = "tracker_days_saved_total";
pub const MEASUREMENTS_SAVED: &str = "tracker_measurements_saved_total";
pub const MEASUREMENTS_REJECTED: &str = "tracker_measurements_rejected_total";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder
///
/// The recorder is process-wide; later calls return the first handle.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = HANDLE.get_or_try_init(|| -> Result<PrometheusHandle> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(handle)
    })?;
    Ok(handle.clone())
}

fn describe() {
    metrics::describe_counter!(DAYS_SAVED, "Daily entries written");
    metrics::describe_counter!(MEASUREMENTS_SAVED, "Measurement entries written");
    metrics::describe_counter!(
        MEASUREMENTS_REJECTED,
        "Measurement saves refused, by reason"
    );
}
