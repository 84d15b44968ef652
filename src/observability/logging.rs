//! Structured logging setup for binaries embedding the clients.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a configured level is present.
pub const DEFAULT_FILTER: &str = "rpc_facade=info";

/// Build the filter: `RUST_LOG` wins, then the configured level, then the default.
pub fn env_filter(configured_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match configured_level {
        Some(level) if !level.trim().is_empty() => {
            EnvFilter::try_new(format!("rpc_facade={}", level.trim()))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    })
}

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init(configured_level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(configured_level))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
