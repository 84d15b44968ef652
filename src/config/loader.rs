//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientsConfig;
use crate::config::settings::{ClientSettings, EventBusSettings, ServiceKind};
use crate::config::validation::{resolve_event_bus, resolve_service, ConfigIssue};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error("No [{0}] table in configuration")]
    MissingService(&'static str),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientsConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_config_str(&content)
}

/// Parse and validate configuration text.
///
/// Every service table present is resolved; issues from all of them are
/// reported together.
pub fn load_config_str(content: &str) -> Result<ClientsConfig, ConfigError> {
    let config: ClientsConfig = toml::from_str(content)?;

    let mut issues = Vec::new();
    for kind in ServiceKind::ALL {
        let result = match kind {
            ServiceKind::EventBus => config.event_bus().map(|r| r.map(|_| ())),
            _ => config.service(kind).map(|r| r.map(|_| ())),
        };
        if let Some(Err(ConfigError::Invalid(found))) = result {
            issues.extend(found);
        }
    }

    if !issues.is_empty() {
        return Err(ConfigError::Invalid(issues));
    }
    Ok(config)
}

impl ClientsConfig {
    /// Resolved settings for a service, `None` when its table is absent.
    ///
    /// For the event bus this resolves only the connection part; use
    /// `event_bus` for the notifier identity.
    pub fn service(&self, kind: ServiceKind) -> Option<Result<ClientSettings, ConfigError>> {
        let table = match kind {
            ServiceKind::CatalogGateway => self.catalog_gateway.as_ref(),
            ServiceKind::CatalogStorage => self.catalog_storage.as_ref(),
            ServiceKind::EventBus => self.event_bus.as_ref().map(|bus| &bus.service),
            ServiceKind::Mail => self.mail.as_ref(),
            ServiceKind::Notification => self.notification.as_ref(),
        }?;
        Some(resolve_service(kind, table).map_err(ConfigError::Invalid))
    }

    pub fn event_bus(&self) -> Option<Result<EventBusSettings, ConfigError>> {
        let table = self.event_bus.as_ref()?;
        Some(resolve_event_bus(table).map_err(ConfigError::Invalid))
    }

    /// Like `service`, with a missing table reported as an error.
    pub fn require(&self, kind: ServiceKind) -> Result<ClientSettings, ConfigError> {
        self.service(kind)
            .unwrap_or(Err(ConfigError::MissingService(kind.name())))
    }

    pub fn require_event_bus(&self) -> Result<EventBusSettings, ConfigError> {
        self.event_bus()
            .unwrap_or(Err(ConfigError::MissingService(ServiceKind::EventBus.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::SelectionPolicy;

    const SAMPLE: &str = r#"
        [observability]
        log_level = "debug"

        [mail]
        hosts = "10.0.0.1:9090,10.0.0.2:9090"
        auth = "user:secret"
        number_of_retries = 2
        scale_mode = "fail_over"

        [event_bus]
        hosts = "10.0.1.1:9092"
        auth = "user:secret"
        client_id = "checkout"
        topics = "orders, payments"
    "#;

    #[test]
    fn test_load_sample() {
        let config = load_config_str(SAMPLE).unwrap();
        assert_eq!(config.observability.log_level, "debug");

        let mail = config.require(ServiceKind::Mail).unwrap();
        assert_eq!(mail.pool.len(), 2);
        assert_eq!(mail.number_of_retries, 2);
        assert_eq!(mail.policy, SelectionPolicy::FailOver);

        let bus = config.require_event_bus().unwrap();
        assert_eq!(bus.topics, vec!["orders", "payments"]);
        assert_eq!(bus.client.timeouts.receive.as_millis(), 1000);
    }

    #[test]
    fn test_missing_table() {
        let config = load_config_str(SAMPLE).unwrap();
        assert!(config.service(ServiceKind::Notification).is_none());
        assert!(matches!(
            config.require(ServiceKind::Notification),
            Err(ConfigError::MissingService("notification"))
        ));
    }

    #[test]
    fn test_issues_collected_across_tables() {
        let err = load_config_str(
            r#"
            [mail]
            hosts = ""
            auth = "u:p"

            [notification]
            hosts = "n:1"
            auth = "broken"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Invalid(issues) => {
                assert_eq!(
                    issues,
                    vec![
                        ConfigIssue::InvalidHosts { service: "mail" },
                        ConfigIssue::InvalidAuth { service: "notification" },
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_typed_settings_use_defaults() {
        let config = load_config_str(
            r#"
            [mail]
            hosts = "m:1"
            auth = "u:p"
            send_timeout_ms = "fast"
            number_of_retries = 1.5
            scale_mode = 1

            [event_bus]
            hosts = "e:1"
            auth = "u:p"
            client_id = "checkout"
            topics = "orders"
            receive_timeout_ms = "slow"
            "#,
        )
        .unwrap();

        let mail = config.require(ServiceKind::Mail).unwrap();
        assert_eq!(mail.timeouts.send.as_millis(), 1000);
        assert_eq!(mail.number_of_retries, 1);
        assert_eq!(mail.policy, SelectionPolicy::Balancing);

        let bus = config.require_event_bus().unwrap();
        assert_eq!(bus.client.timeouts.receive.as_millis(), 1000);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(load_config_str("[mail"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/rpc-facade.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
