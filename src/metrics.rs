//! Prometheus metrics for the prediction service.
//!
//! This module provides metrics for:
//! - Prediction request latency
//! - Classifier inference latency
//! - Prediction, validation-failure and error counters

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Prediction request latency metric name.
pub const METRIC_REQUEST_LATENCY: &str = "prediction_request_latency_ms";
/// Classifier inference latency metric name.
pub const METRIC_INFERENCE_LATENCY: &str = "model_inference_latency_ms";
/// Successful predictions counter metric name.
pub const METRIC_PREDICTIONS: &str = "predictions_total";
/// Validation failures counter metric name.
pub const METRIC_VALIDATION_FAILURES: &str = "validation_failures_total";
/// Prediction errors counter metric name.
pub const METRIC_PREDICTION_ERRORS: &str = "prediction_errors_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_REQUEST_LATENCY,
        "Prediction request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_INFERENCE_LATENCY,
        "Classifier inference latency in milliseconds"
    );

    describe_counter!(METRIC_PREDICTIONS, "Total number of successful predictions");
    describe_counter!(
        METRIC_VALIDATION_FAILURES,
        "Total number of requests rejected by validation"
    );
    describe_counter!(
        METRIC_PREDICTION_ERRORS,
        "Total number of requests that failed for any other reason"
    );

    debug!("Metrics initialized");
}

/// Increment the successful predictions counter.
pub fn inc_predictions() {
    counter!(METRIC_PREDICTIONS).increment(1);
}

/// Increment the validation failures counter.
pub fn inc_validation_failures() {
    counter!(METRIC_VALIDATION_FAILURES).increment(1);
}

/// Increment the prediction errors counter.
pub fn inc_prediction_errors() {
    counter!(METRIC_PREDICTION_ERRORS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for the full prediction request.
pub fn timer_request() -> LatencyTimer {
    LatencyTimer::new(METRIC_REQUEST_LATENCY)
}

/// Create a latency timer for classifier inference.
pub fn timer_inference() -> LatencyTimer {
    LatencyTimer::new(METRIC_INFERENCE_LATENCY)
}
