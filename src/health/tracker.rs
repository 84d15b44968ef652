//! Alive/dead map shared by every call made through one client.

use dashmap::DashMap;

use crate::load_balancer::{endpoint::Endpoint, pool::HostPool};
use crate::observability::metrics;

/// Mapping from endpoint to alive (`true`) or dead (`false`).
///
/// Entries are created at construction and never removed; a dead endpoint
/// stays dead until an attempt against it succeeds again.
#[derive(Debug, Default)]
pub struct HealthTracker {
    states: DashMap<Endpoint, bool>,
}

impl HealthTracker {
    /// Start tracking every endpoint of the pool as alive.
    pub fn new(pool: &HostPool) -> Self {
        let states = DashMap::with_capacity(pool.len());
        for endpoint in pool.iter() {
            states.insert(endpoint.clone(), true);
            metrics::record_endpoint_health(&endpoint.key(), true);
        }
        Self { states }
    }

    /// A tracker that knows no endpoint; every read is `false`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn mark_alive(&self, endpoint: &Endpoint) {
        self.set(endpoint, true);
    }

    pub fn mark_dead(&self, endpoint: &Endpoint) {
        self.set(endpoint, false);
    }

    /// `false` for endpoints the tracker has never heard of.
    pub fn is_alive(&self, endpoint: &Endpoint) -> bool {
        self.states.get(endpoint).map(|alive| *alive).unwrap_or(false)
    }

    /// Current flags in pool order.
    pub fn snapshot(&self, pool: &HostPool) -> Vec<(Endpoint, bool)> {
        pool.iter()
            .map(|endpoint| (endpoint.clone(), self.is_alive(endpoint)))
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.states.iter().filter(|entry| *entry.value()).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn set(&self, endpoint: &Endpoint, alive: bool) {
        // An empty tracker belongs to a client that was never given a pool.
        if self.states.is_empty() {
            return;
        }

        let previous = self.states.insert(endpoint.clone(), alive);
        if previous != Some(alive) {
            tracing::info!(endpoint = %endpoint, alive, "Endpoint health changed");
        } else {
            tracing::debug!(endpoint = %endpoint, alive, "Endpoint health confirmed");
        }

        metrics::record_endpoint_health(&endpoint.key(), alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pool() -> HostPool {
        HostPool::parse("a:1,b:2").unwrap()
    }

    #[test]
    fn test_all_endpoints_start_alive() {
        let tracker = HealthTracker::new(&pool());
        assert_eq!(tracker.len(), 2);
        assert!(tracker.is_alive(&Endpoint::new("a", 1)));
        assert!(tracker.is_alive(&Endpoint::new("b", 2)));
    }

    #[test]
    fn test_unknown_endpoint_reads_dead() {
        let tracker = HealthTracker::new(&pool());
        assert!(!tracker.is_alive(&Endpoint::new("c", 3)));

        let empty = HealthTracker::empty();
        assert!(!empty.is_alive(&Endpoint::new("a", 1)));
    }

    #[test]
    fn test_health_convergence() {
        let tracker = HealthTracker::new(&pool());
        let a = Endpoint::new("a", 1);

        tracker.mark_dead(&a);
        assert!(!tracker.is_alive(&a));
        tracker.mark_dead(&a);
        assert!(!tracker.is_alive(&a));

        tracker.mark_alive(&a);
        assert!(tracker.is_alive(&a));
        assert_eq!(tracker.alive_count(), 2);
    }

    #[test]
    fn test_writes_on_empty_tracker_are_ignored() {
        let tracker = HealthTracker::empty();
        let a = Endpoint::new("a", 1);
        tracker.mark_alive(&a);
        assert!(tracker.is_empty());
        assert!(!tracker.is_alive(&a));
    }

    #[test]
    fn test_writes_by_key_for_unknown_endpoint() {
        let tracker = HealthTracker::new(&pool());
        let c = Endpoint::new("c", 3);
        tracker.mark_alive(&c);
        assert!(tracker.is_alive(&c));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_snapshot_in_pool_order() {
        let pool = pool();
        let tracker = HealthTracker::new(&pool);
        tracker.mark_dead(&Endpoint::new("b", 2));
        assert_eq!(
            tracker.snapshot(&pool),
            vec![(Endpoint::new("a", 1), true), (Endpoint::new("b", 2), false)]
        );
    }

    #[test]
    fn test_concurrent_updates() {
        let pool = HostPool::parse("a:1,b:2,c:3,d:4").unwrap();
        let tracker = Arc::new(HealthTracker::new(&pool));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = tracker.clone();
                let endpoints = pool.endpoints().to_vec();
                std::thread::spawn(move || {
                    for round in 0..500 {
                        let endpoint = &endpoints[(i + round) % endpoints.len()];
                        if round % 2 == 0 {
                            tracker.mark_dead(endpoint);
                        } else {
                            tracker.mark_alive(endpoint);
                        }
                        let _ = tracker.is_alive(endpoint);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.len(), 4);
        for endpoint in pool.iter() {
            tracker.mark_alive(endpoint);
        }
        assert_eq!(tracker.alive_count(), 4);
    }
}
