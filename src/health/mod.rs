//! Endpoint health tracking.
//!
//! # Data Flow
//! ```text
//! Client construction:
//!     HostPool → tracker.rs (every endpoint starts alive)
//!
//! Every attempt (resilience/retries.rs):
//!     success → mark_alive(endpoint)
//!     failure → mark_dead(endpoint)
//!
//! Every selection (load_balancer/selector.rs):
//!     is_alive(endpoint) filters the candidate ordering
//! ```
//!
//! # Design Decisions
//! - Health is a client-local hint, not a cluster-wide view
//! - No thresholds and no expiry: one result flips the flag
//! - Unknown endpoints read as dead (fail closed)
//! - Per-key locking so concurrent callers never lose an update

pub mod tracker;

pub use tracker::HealthTracker;
