//! Multi-host RPC client facades.
//!
//! Each facade wraps a [`ServiceClient`], which spreads calls over a pool of
//! endpoints, tracks their health and retries failed attempts on the next
//! candidate.

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod load_balancer;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;

pub use client::{Credentials, OnewayOutcome, OperationContext, Reply, ServiceClient};
pub use config::{load_config, ClientSettings, ClientsConfig, ConfigError, ServiceKind};
pub use error::{ErrorCode, Exhausted, Failure, ValidationError};
pub use load_balancer::{Endpoint, HostPool, SelectionPolicy};
pub use services::{CatalogGatewayClient, CatalogStorageClient, EventBusNotifier, MailClient, NotificationClient};
