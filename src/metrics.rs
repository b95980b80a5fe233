//! Prometheus metrics for habit activity and request latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Habits created counter metric name.
pub const METRIC_HABITS_CREATED: &str = "habits_created_total";
/// Habits deleted counter metric name.
pub const METRIC_HABITS_DELETED: &str = "habits_deleted_total";
/// Completions logged counter metric name.
pub const METRIC_COMPLETIONS_LOGGED: &str = "completions_logged_total";
/// Rejected duplicate completions counter metric name.
pub const METRIC_COMPLETION_CONFLICTS: &str = "completion_conflicts_total";
/// Live habits gauge metric name.
pub const METRIC_HABITS_ACTIVE: &str = "habits_active";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the handle renders `/metrics`.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_HABITS_CREATED, "Total number of habits created");
    describe_counter!(METRIC_HABITS_DELETED, "Total number of habits deleted");
    describe_counter!(
        METRIC_COMPLETIONS_LOGGED,
        "Total number of completions logged"
    );
    describe_counter!(
        METRIC_COMPLETION_CONFLICTS,
        "Total number of duplicate completions rejected"
    );
    describe_gauge!(METRIC_HABITS_ACTIVE, "Number of habits currently stored");

    debug!("Metrics initialized");
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment habits created counter.
pub fn inc_habits_created() {
    counter!(METRIC_HABITS_CREATED).increment(1);
}

/// Increment habits deleted counter.
pub fn inc_habits_deleted() {
    counter!(METRIC_HABITS_DELETED).increment(1);
}

/// Increment completions logged counter.
pub fn inc_completions_logged() {
    counter!(METRIC_COMPLETIONS_LOGGED).increment(1);
}

/// Increment duplicate completion counter.
pub fn inc_completion_conflicts() {
    counter!(METRIC_COMPLETION_CONFLICTS).increment(1);
}

/// Set the live habit gauge.
pub fn set_habits_active(count: usize) {
    gauge!(METRIC_HABITS_ACTIVE).set(count as f64);
}

/// RAII guard for timing a request.
/// Records latency under its endpoint label when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    #[cfg(test)]
    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}
