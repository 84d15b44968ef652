//! Resolved, immutable client settings.

use crate::client::Credentials;
use crate::load_balancer::{HostPool, SelectionPolicy};
use crate::resilience::Timeouts;

/// The remote services a client can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    CatalogGateway,
    CatalogStorage,
    EventBus,
    Mail,
    Notification,
}

/// Values applied when a setting is absent or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDefaults {
    pub send_timeout_ms: u64,
    pub receive_timeout_ms: u64,
    pub number_of_retries: usize,
    pub policy: SelectionPolicy,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::CatalogGateway,
        ServiceKind::CatalogStorage,
        ServiceKind::EventBus,
        ServiceKind::Mail,
        ServiceKind::Notification,
    ];

    /// Config table name, also used as the `service` metric label.
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::CatalogGateway => "catalog_gateway",
            ServiceKind::CatalogStorage => "catalog_storage",
            ServiceKind::EventBus => "event_bus",
            ServiceKind::Mail => "mail",
            ServiceKind::Notification => "notification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.name() == normalized)
    }

    pub fn defaults(self) -> ServiceDefaults {
        let receive_timeout_ms = match self {
            ServiceKind::EventBus => 1000,
            _ => 2000,
        };

        ServiceDefaults {
            send_timeout_ms: 1000,
            receive_timeout_ms,
            number_of_retries: 1,
            policy: SelectionPolicy::Balancing,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a `ServiceClient` needs, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub pool: HostPool,
    pub credentials: Credentials,
    pub timeouts: Timeouts,
    pub number_of_retries: usize,
    pub policy: SelectionPolicy,
}

impl ClientSettings {
    /// Settings with the service defaults for everything but pool and credentials.
    pub fn with_defaults(kind: ServiceKind, pool: HostPool, credentials: Credentials) -> Self {
        let defaults = kind.defaults();
        Self {
            pool,
            credentials,
            timeouts: Timeouts::from_millis(defaults.send_timeout_ms, defaults.receive_timeout_ms),
            number_of_retries: defaults.number_of_retries,
            policy: defaults.policy,
        }
    }
}

/// Event-bus notifier settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusSettings {
    pub client: ClientSettings,
    pub client_id: String,
    pub topics: Vec<String>,
}
