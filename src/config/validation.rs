//! Configuration resolution and validation.
//!
//! # Responsibilities
//! - Turn a raw `ServiceConfig` into immutable `ClientSettings`
//! - Reject unusable required fields (`hosts`, `auth`, event-bus identity)
//! - Replace out-of-range timeouts, retries and scale modes with service defaults
//!
//! # Design Decisions
//! - Returns all issues of a table, not just the first
//! - Fallbacks are logged at `warn`, never rejected
//! - Resolution is a pure function of the raw table and the service kind

use thiserror::Error;

use crate::client::Credentials;
use crate::config::schema::{EventBusConfig, ServiceConfig};
use crate::config::settings::{ClientSettings, EventBusSettings, ServiceKind};
use crate::load_balancer::{HostPool, SelectionPolicy};
use crate::resilience::Timeouts;

/// A required setting that cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("{service}: \"hosts\" has no valid host:port entry")]
    InvalidHosts { service: &'static str },

    #[error("{service}: \"auth\" must be username:password")]
    InvalidAuth { service: &'static str },

    #[error("{service}: \"client_id\" must not be empty")]
    InvalidClientId { service: &'static str },

    #[error("{service}: \"topics\" has no topic")]
    InvalidTopics { service: &'static str },
}

/// Resolve one service table.
pub fn resolve_service(kind: ServiceKind, config: &ServiceConfig) -> Result<ClientSettings, Vec<ConfigIssue>> {
    let service = kind.name();
    let mut issues = Vec::new();

    let pool = HostPool::parse(&config.hosts);
    if pool.is_none() {
        issues.push(ConfigIssue::InvalidHosts { service });
    }

    let credentials = Credentials::parse(&config.auth);
    if credentials.is_none() {
        issues.push(ConfigIssue::InvalidAuth { service });
    }

    let (Some(pool), Some(credentials)) = (pool, credentials) else {
        return Err(issues);
    };

    let defaults = kind.defaults();
    let send_ms = positive_or_default(service, "send_timeout_ms", config.send_timeout_ms.as_ref(), defaults.send_timeout_ms);
    let receive_ms = positive_or_default(
        service,
        "receive_timeout_ms",
        config.receive_timeout_ms.as_ref(),
        defaults.receive_timeout_ms,
    );

    let number_of_retries = match config.number_of_retries.as_ref() {
        None => defaults.number_of_retries,
        Some(value) => match value.as_integer().and_then(|v| usize::try_from(v).ok()) {
            Some(retries) => retries,
            None => fallback(service, "number_of_retries", value, defaults.number_of_retries),
        },
    };

    let policy = match config.scale_mode.as_ref() {
        None => defaults.policy,
        Some(value) => match value.as_str().and_then(SelectionPolicy::parse) {
            Some(policy) => policy,
            None => fallback(service, "scale_mode", value, defaults.policy),
        },
    };

    Ok(ClientSettings {
        pool,
        credentials,
        timeouts: Timeouts::from_millis(send_ms, receive_ms),
        number_of_retries,
        policy,
    })
}

/// Resolve the event-bus table, including its notifier identity.
pub fn resolve_event_bus(config: &EventBusConfig) -> Result<EventBusSettings, Vec<ConfigIssue>> {
    let service = ServiceKind::EventBus.name();
    let client = resolve_service(ServiceKind::EventBus, &config.service);
    let mut issues = client.as_ref().err().cloned().unwrap_or_default();

    let client_id = config.client_id.trim().to_string();
    if client_id.is_empty() {
        issues.push(ConfigIssue::InvalidClientId { service });
    }

    let topics = parse_topics(&config.topics);
    if topics.is_empty() {
        issues.push(ConfigIssue::InvalidTopics { service });
    }

    match client {
        Ok(client) if issues.is_empty() => Ok(EventBusSettings {
            client,
            client_id,
            topics,
        }),
        _ => Err(issues),
    }
}

/// Split a comma separated topic list, dropping blank entries.
pub fn parse_topics(topics: &str) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::new();
    for topic in topics.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !parsed.iter().any(|t| t == topic) {
            parsed.push(topic.to_string());
        }
    }
    parsed
}

fn positive_or_default(service: &'static str, field: &'static str, value: Option<&toml::Value>, default: u64) -> u64 {
    match value {
        None => default,
        Some(value) => match value.as_integer() {
            Some(millis) if millis > 0 => millis as u64,
            _ => fallback(service, field, value, default),
        },
    }
}

/// Log an unusable setting and hand back its default.
fn fallback<T: std::fmt::Display>(service: &'static str, field: &'static str, value: &toml::Value, default: T) -> T {
    tracing::warn!(service, field, value = %value, default = %default, "Invalid setting, using default");
    default
}
