// ============================================================================
// Prometheus Metrics - Inquiry Pipeline Outcomes
// ============================================================================
//
// ## Metrics Collected:
//
// 1. **Submissions**
//    - Counter: inquiry_pipeline_submissions_total
//    - Labels: outcome (succeeded | failed | rejected_invalid | rejected_in_flight)
//
// 2. **Fetches**
//    - Counter: inquiry_pipeline_fetches_total
//    - Labels: operation (all | by_id | by_buyer), outcome (succeeded | failed)
//
// 3. **Request latency**
//    - Histogram: inquiry_pipeline_request_duration_seconds
//    - Labels: operation
//
// Registered in the default registry; render with `gather_metrics()`.
//
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

pub const OUTCOME_SUCCEEDED: &str = "succeeded";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_REJECTED_INVALID: &str = "rejected_invalid";
pub const OUTCOME_REJECTED_IN_FLIGHT: &str = "rejected_in_flight";

lazy_static! {
    pub static ref SUBMISSIONS_TOTAL: CounterVec = register_counter_vec!(
        "inquiry_pipeline_submissions_total",
        "Inquiry create attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref FETCHES_TOTAL: CounterVec = register_counter_vec!(
        "inquiry_pipeline_fetches_total",
        "Inquiry read operations by operation and outcome",
        &["operation", "outcome"]
    )
    .unwrap();

    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "inquiry_pipeline_request_duration_seconds",
        "Marketplace API call latency in seconds",
        &["operation"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();
}

pub fn record_submission(outcome: &str) {
    SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_fetch(operation: &str, succeeded: bool) {
    let outcome = if succeeded { OUTCOME_SUCCEEDED } else { OUTCOME_FAILED };
    FETCHES_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn observe_request_duration(operation: &str, seconds: f64) {
    REQUEST_DURATION.with_label_values(&[operation]).observe(seconds);
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_submission_counts() {
        let before = SUBMISSIONS_TOTAL
            .with_label_values(&[OUTCOME_REJECTED_IN_FLIGHT])
            .get();
        record_submission(OUTCOME_REJECTED_IN_FLIGHT);
        let after = SUBMISSIONS_TOTAL
            .with_label_values(&[OUTCOME_REJECTED_IN_FLIGHT])
            .get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_gather_includes_pipeline_metrics() {
        record_fetch("all", true);
        observe_request_duration("all", 0.02);
        let text = gather_metrics();
        assert!(text.contains("inquiry_pipeline_fetches_total"));
        assert!(text.contains("inquiry_pipeline_request_duration_seconds"));
    }
}
