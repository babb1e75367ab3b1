// Prometheus metrics for the execution service

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    pub static ref EXECUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "judgeway_executions_total",
        "Executions that returned a result, by outcome",
        &["outcome"]
    )
    .expect("metric can be registered");
    pub static ref TRANSPORT_ERRORS_TOTAL: IntCounter = register_int_counter!(
        "judgeway_transport_errors_total",
        "Executions that failed to reach the sandbox"
    )
    .expect("metric can be registered");
    pub static ref BATCH_CASES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "judgeway_batch_cases_total",
        "Batch test cases evaluated, by result",
        &["passed"]
    )
    .expect("metric can be registered");
    pub static ref EXECUTE_DURATION_SECONDS: Histogram = register_histogram!(
        "judgeway_execute_duration_seconds",
        "Wall-clock time of one submit-and-poll cycle",
        vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0]
    )
    .expect("metric can be registered");
}

/// Render the default registry in the text exposition format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
