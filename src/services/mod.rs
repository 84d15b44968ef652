//! Service facades.
//!
//! # Data Flow
//! ```text
//! Caller
//!     → facade method (validate and normalize the request, fail fast)
//!     → ServiceClient::reply / call_oneway / spawn_oneway
//!     → Reply<T> (remote answer, or default reply carrying the exhaustion code)
//! ```
//!
//! # Design Decisions
//! - Validation errors are returned before any endpoint is contacted
//! - Response payloads are opaque JSON unless the shape is fixed and small
//! - Fire-and-forget methods come in pairs: `_oneway` awaits delivery,
//!   `_detached` spawns it and returns the task handle

pub mod catalog_gateway;
pub mod catalog_storage;
pub mod common;
pub mod event_bus;
pub mod mail;
pub mod notification;

pub use catalog_gateway::CatalogGatewayClient;
pub use catalog_storage::CatalogStorageClient;
pub use event_bus::EventBusNotifier;
pub use mail::MailClient;
pub use notification::NotificationClient;
