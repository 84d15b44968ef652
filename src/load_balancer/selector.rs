//! Candidate ordering for one call.
//!
//! # Responsibilities
//! - Combine a selection policy with the health tracker
//! - Yield each alive endpoint at most once, starting at the policy's index
//! - Finish with the first pool endpoint when the scan did not yield it

use crate::health::HealthTracker;
use crate::load_balancer::{endpoint::Endpoint, pool::HostPool, SelectionPolicy, Selector};

/// Produces candidate orderings according to a fixed policy.
#[derive(Debug)]
pub struct EndpointSelector {
    policy: SelectionPolicy,
    selector: Box<dyn Selector>,
}

impl EndpointSelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            selector: policy.selector(),
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Lazily order the pool for one call.
    ///
    /// The iterator is bounded by the pool size. Once the scan is done,
    /// `pool[0]` is yielded if it was not yielded already, so a call whose
    /// alive candidates all failed still reaches the last-resort endpoint.
    pub fn select<'a>(&self, pool: &'a HostPool, health: &'a HealthTracker) -> Candidates<'a> {
        Candidates {
            pool,
            health,
            start: self.selector.start_index(pool.len()),
            scanned: 0,
            first_yielded: false,
        }
    }
}

/// Lazy iterator over the endpoints to try for one call.
#[derive(Debug)]
pub struct Candidates<'a> {
    pool: &'a HostPool,
    health: &'a HealthTracker,
    start: usize,
    scanned: usize,
    first_yielded: bool,
}

impl Candidates<'_> {
    /// Index the scan started from.
    pub fn start(&self) -> usize {
        self.start
    }
}

impl Iterator for Candidates<'_> {
    type Item = Endpoint;

    fn next(&mut self) -> Option<Endpoint> {
        let len = self.pool.len();

        while self.scanned < len {
            let index = (self.start + self.scanned) % len;
            self.scanned += 1;

            let Some(endpoint) = self.pool.get(index) else {
                continue;
            };
            if self.health.is_alive(endpoint) {
                self.first_yielded |= index == 0;
                return Some(endpoint.clone());
            }
        }

        if !self.first_yielded {
            self.first_yielded = true;
            tracing::debug!(endpoint = %self.pool.first(), "Falling back to first endpoint");
            return Some(self.pool.first().clone());
        }

        None
    }
}
