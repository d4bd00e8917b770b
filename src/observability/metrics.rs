//! Metrics recorder and Prometheus exposition.
//!
//! # Responsibilities
//! - Install the global metrics recorder once per process
//! - Hand out the render handle for the exposition route
//!
//! # Metrics
//! - `server_requests_in_flight` (gauge): requests admitted and not finished
//! - `server_requests_rejected_total` (counter): requests refused while the
//!   admission gate is closing

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Global Prometheus handle.
///
/// The metrics registry is process-wide and can only be installed once, so
/// every server instance shares one recorder.
pub fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install metrics recorder")
        })
        .clone()
}
