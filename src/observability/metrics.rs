//! Metrics collection and exposition.
//!
//! # Metrics
//! - `directory_search_requests_total` (counter): searches by outcome
//! - `directory_search_results` (histogram): rows returned per page
//! - `directory_search_duration_seconds` (histogram): engine latency
//! - `directory_rate_limited_total` (counter): rate limit rejections
//! - `directory_admission_failures_total` (counter): admission failures by reason
//! - `directory_storage_errors_total` (counter): storage failures by operation
//! - `directory_employees_added_total` (counter): successful inserts
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_search(outcome: &'static str, results: usize, start: Instant) {
    metrics::counter!("directory_search_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("directory_search_results").record(results as f64);
    metrics::histogram!("directory_search_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("directory_rate_limited_total").increment(1);
}

pub fn record_admission_failure(reason: &'static str) {
    metrics::counter!("directory_admission_failures_total", "reason" => reason).increment(1);
}

pub fn record_storage_error(operation: &'static str) {
    metrics::counter!("directory_storage_errors_total", "operation" => operation).increment(1);
}

pub fn record_employee_added() {
    metrics::counter!("directory_employees_added_total").increment(1);
}
