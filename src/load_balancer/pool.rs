//! Host pool management.
//!
//! # Responsibilities
//! - Parse a delimited host list into an ordered set of endpoints
//! - Drop blank, malformed and duplicate entries
//! - Keep insertion order (FailOver priority and the index-0 fallback depend on it)

use std::sync::Arc;

use crate::load_balancer::endpoint::Endpoint;

/// Fixed, ordered, non-empty set of endpoints a client may contact.
///
/// Built once at client construction and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPool {
    endpoints: Arc<[Endpoint]>,
}

impl HostPool {
    /// Parse a `"h1:p1,h2:p2,..."` host list.
    ///
    /// Returns `None` when no valid entry survives; callers turn that into a
    /// configuration error.
    pub fn parse(hosts: &str) -> Option<Self> {
        Self::from_endpoints(parse_hosts(hosts))
    }

    /// Build a pool from endpoints, dropping duplicates after their first occurrence.
    pub fn from_endpoints(endpoints: impl IntoIterator<Item = Endpoint>) -> Option<Self> {
        let mut unique: Vec<Endpoint> = Vec::new();
        for endpoint in endpoints {
            if unique.contains(&endpoint) {
                tracing::debug!(endpoint = %endpoint, "Ignoring duplicate host entry");
                continue;
            }
            unique.push(endpoint);
        }

        if unique.is_empty() {
            return None;
        }

        Some(Self {
            endpoints: unique.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false; a pool holds at least one endpoint.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The last-resort endpoint (index 0).
    pub fn first(&self) -> &Endpoint {
        &self.endpoints[0]
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}

/// Split a host list on `,`, keeping the entries that parse as `host:port`.
pub fn parse_hosts(hosts: &str) -> Vec<Endpoint> {
    hosts
        .split(',')
        .filter_map(|entry| {
            if entry.trim().is_empty() {
                return None;
            }
            let parsed = Endpoint::parse(entry);
            if parsed.is_none() {
                tracing::warn!("Invalid host entry: {}", entry.trim());
            }
            parsed
        })
        .collect()
}
