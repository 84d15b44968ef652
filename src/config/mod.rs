//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize into schema.rs types)
//!     → validation.rs (required fields, default fallbacks)
//!     → settings.rs ClientSettings (validated, immutable)
//!     → handed to one ServiceClient per service
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once resolved; a client never re-reads its config
//! - Missing or out-of-range optional values fall back to per-service defaults
//! - Validation separates syntactic (serde) from semantic checks
//! - Settings can be built in code without a file

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, load_config_str, ConfigError};
pub use schema::{ClientsConfig, EventBusConfig, ObservabilityConfig, ServiceConfig};
pub use settings::{ClientSettings, EventBusSettings, ServiceDefaults, ServiceKind};
pub use validation::ConfigIssue;
