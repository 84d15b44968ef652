//! Shared facade plumbing.
//!
//! # Data Flow
//! ```text
//! Facade method (validated request)
//!     → service_client.rs (serialize payload, snapshot context, open span)
//!     → RetryingInvoker::invoke
//!         → per candidate: Connector::connect → Connection::call → close
//!     → decode reply, or turn Exhausted into a default Reply
//! ```
//!
//! # Design Decisions
//! - `ServiceClient` is a cheap `Clone` handle; clones share health and context
//! - The operation context is swapped atomically, never mutated in place
//! - Fire-and-forget calls return `OnewayOutcome`, which has no payload

pub mod context;
pub mod reply;
pub mod service_client;

pub use context::{Credentials, OperationContext};
pub use reply::{ErrorInfo, OnewayOutcome, Reply};
pub use service_client::ServiceClient;
