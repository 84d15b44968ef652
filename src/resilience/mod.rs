//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Facade call:
//!     → retries.rs (ask the selector for candidates, at most retries + 1)
//!     → per candidate: timeouts.rs bounds connect, send and receive
//!     → success marks the endpoint alive and returns
//!     → failure marks it dead and moves on
//!     → no candidate left: Exhausted
//! ```
//!
//! # Design Decisions
//! - Every network phase has a deadline; there is no overall deadline
//! - Attempts are strictly sequential; an endpoint is tried at most once per call
//! - Attempt failures are recovered here and never surface as errors of their own

pub mod retries;
pub mod timeouts;

pub use retries::RetryingInvoker;
pub use timeouts::Timeouts;
