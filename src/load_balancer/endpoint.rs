//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single remote service instance as a `(host, port)` pair
//! - Parse one `host:port` entry of a host list
//! - Provide the `host:port` key used for health lookups and metric labels

/// One instance of a remote service.
///
/// Immutable once parsed; equality and hashing use `(host, port)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from already-validated parts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a single `host:port` entry.
    ///
    /// Returns `None` when the entry does not contain exactly one `:`, the
    /// host is blank after trimming, or the port is not a positive integer.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.split(':');
        let host = parts.next()?.trim();
        let port = parts.next()?.trim();
        if parts.next().is_some() || host.is_empty() {
            return None;
        }

        match port.parse::<u16>() {
            Ok(port) if port > 0 => Some(Self::new(host, port)),
            _ => None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Lookup key, `host:port`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
