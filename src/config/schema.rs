//! Configuration schema definitions.
//!
//! This module defines the raw configuration file structure. The tuning
//! fields of a service table are kept as raw TOML values so that wrong-typed,
//! out-of-range or unknown values survive deserialization and can be replaced
//! by defaults during resolution instead of failing the whole file.

use serde::{Deserialize, Serialize};

/// Root configuration: one optional table per remote service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientsConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub catalog_gateway: Option<ServiceConfig>,

    pub catalog_storage: Option<ServiceConfig>,

    pub event_bus: Option<EventBusConfig>,

    pub mail: Option<ServiceConfig>,

    pub notification: Option<ServiceConfig>,
}

/// Connection settings shared by every service table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Comma separated `host:port` list (required).
    pub hosts: String,

    /// `username:password` (required).
    pub auth: String,

    /// Connect and write timeout; an integer > 0.
    pub send_timeout_ms: Option<toml::Value>,

    /// Read timeout; an integer > 0.
    pub receive_timeout_ms: Option<toml::Value>,

    /// Additional attempts beyond the first; an integer >= 0.
    pub number_of_retries: Option<toml::Value>,

    /// `"balancing"` or `"fail_over"`.
    pub scale_mode: Option<toml::Value>,
}

impl ServiceConfig {
    pub fn new(hosts: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            hosts: hosts.into(),
            auth: auth.into(),
            ..Self::default()
        }
    }
}

/// Event-bus table: connection settings plus the notifier identity.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EventBusConfig {
    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Stamped on every published message (required).
    #[serde(default)]
    pub client_id: String,

    /// Comma separated topics the notifier may publish to (required).
    #[serde(default)]
    pub topics: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file() {
        let config: ClientsConfig = toml::from_str(
            r#"
            [mail]
            hosts = "m1:9090"
            auth = "u:p"
            "#,
        )
        .unwrap();

        let mail = config.mail.unwrap();
        assert_eq!(mail.hosts, "m1:9090");
        assert_eq!(mail.send_timeout_ms, None);
        assert!(config.notification.is_none());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_event_bus_table_flattens_service_fields() {
        let config: ClientsConfig = toml::from_str(
            r#"
            [event_bus]
            hosts = "e1:1"
            auth = "u:p"
            send_timeout_ms = -5
            scale_mode = "fail_over"
            client_id = "checkout"
            topics = "orders, payments"
            "#,
        )
        .unwrap();

        let bus = config.event_bus.unwrap();
        assert_eq!(bus.service.hosts, "e1:1");
        assert_eq!(bus.service.send_timeout_ms, Some(toml::Value::Integer(-5)));
        assert_eq!(bus.service.scale_mode.as_ref().and_then(toml::Value::as_str), Some("fail_over"));
        assert_eq!(bus.client_id, "checkout");
    }

    #[test]
    fn test_wrong_typed_tuning_fields_still_parse() {
        let config: ClientsConfig = toml::from_str(
            r#"
            [mail]
            hosts = "m1:9090"
            auth = "u:p"
            send_timeout_ms = "fast"
            receive_timeout_ms = true
            number_of_retries = 1.5
            scale_mode = 1
            "#,
        )
        .unwrap();

        let mail = config.mail.unwrap();
        assert_eq!(mail.send_timeout_ms, Some(toml::Value::String("fast".into())));
        assert_eq!(mail.number_of_retries, Some(toml::Value::Float(1.5)));
        assert_eq!(mail.scale_mode, Some(toml::Value::Integer(1)));
    }
}
