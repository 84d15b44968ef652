//! Trace correlation for remote calls.
//!
//! # Responsibilities
//! - Generate trace ids for callers that do not bring their own
//! - Create one span per facade call so attempt logs share its fields

use tracing::Span;

/// A fresh trace id (UUID v4, hyphenated).
pub fn new_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Span wrapping every attempt of one call.
pub fn call_span(service: &'static str, method: &'static str, trace_id: Option<&str>) -> Span {
    tracing::info_span!(
        "rpc_call",
        service,
        method,
        trace_id = trace_id.unwrap_or("-")
    )
}
