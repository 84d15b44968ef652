//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Core and facades produce:
//!     → tracing events (attempt failures, exhaustion, health changes)
//!     → metrics.rs (attempt counters, call latency, endpoint health gauge)
//!     → tracing.rs (per-call spans carrying the trace id)
//!
//! Consumers:
//!     → logging.rs subscriber installed by the binary
//!     → whatever `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Metric updates are no-ops until a recorder exists
//! - Trace ids travel inside the operation context, not in log fields only

pub mod logging;
pub mod metrics;
pub mod tracing;
