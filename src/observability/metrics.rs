//! Metric recording.
//!
//! # Metrics
//! - `rpc_attempts_total` (counter): attempts by service, method, outcome
//! - `rpc_calls_exhausted_total` (counter): calls that spent the whole retry budget
//! - `rpc_call_duration_seconds` (histogram): end-to-end call latency
//! - `rpc_endpoint_alive` (gauge): 1=alive, 0=dead

use std::time::Instant;

/// Record one attempt against an endpoint.
pub fn record_attempt(service: &'static str, method: &'static str, outcome: &'static str) {
    metrics::counter!(
        "rpc_attempts_total",
        "service" => service,
        "method" => method,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a call that ran out of candidates.
pub fn record_exhausted(service: &'static str, method: &'static str) {
    metrics::counter!(
        "rpc_calls_exhausted_total",
        "service" => service,
        "method" => method
    )
    .increment(1);
}

/// Record end-to-end call latency.
pub fn record_call(service: &'static str, method: &'static str, start: Instant) {
    metrics::histogram!(
        "rpc_call_duration_seconds",
        "service" => service,
        "method" => method
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the health flag of an endpoint.
pub fn record_endpoint_health(endpoint: &str, alive: bool) {
    metrics::gauge!("rpc_endpoint_alive", "endpoint" => endpoint.to_string())
        .set(if alive { 1.0 } else { 0.0 });
}
