//! Retry logic.
//!
//! # Responsibilities
//! - Walk the candidate ordering of one call, at most `number_of_retries + 1` endpoints
//! - Update the shared health tracker after every attempt
//! - Stop at the first success; report exhaustion as a value
//! - Remember the last attempt failure for diagnostics

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;

use crate::error::{Exhausted, Failure};
use crate::health::HealthTracker;
use crate::load_balancer::{Endpoint, EndpointSelector, HostPool, SelectionPolicy};
use crate::observability::metrics;

/// Orchestrates the attempts of every call made through one client.
#[derive(Debug)]
pub struct RetryingInvoker {
    service: &'static str,
    pool: HostPool,
    health: Arc<HealthTracker>,
    selector: EndpointSelector,
    number_of_retries: usize,
    last_failure: ArcSwapOption<Failure>,
}

impl RetryingInvoker {
    pub fn new(
        service: &'static str,
        pool: HostPool,
        health: Arc<HealthTracker>,
        policy: SelectionPolicy,
        number_of_retries: usize,
    ) -> Self {
        Self {
            service,
            pool,
            health,
            selector: EndpointSelector::new(policy),
            number_of_retries,
            last_failure: ArcSwapOption::empty(),
        }
    }

    /// Upper bound on attempts per call. Fewer happen when the pool is smaller.
    pub fn max_attempts(&self) -> usize {
        self.number_of_retries.saturating_add(1)
    }

    /// Run `operation` against successive candidates until one succeeds.
    ///
    /// `operation` performs exactly one remote call against the endpoint it is
    /// given. Its failures are absorbed here: the endpoint is marked dead and
    /// the next candidate is tried. Only when no candidate is left does the
    /// call return `Exhausted`.
    pub async fn invoke<T, F, Fut>(&self, method: &'static str, mut operation: F) -> Result<T, Exhausted>
    where
        F: FnMut(Endpoint) -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let start = Instant::now();
        let mut attempts = 0usize;
        let mut last: Option<Failure> = None;

        let candidates = self
            .selector
            .select(&self.pool, &self.health)
            .take(self.max_attempts());

        for endpoint in candidates {
            attempts += 1;

            match operation(endpoint.clone()).await {
                Ok(value) => {
                    self.health.mark_alive(&endpoint);
                    metrics::record_attempt(self.service, method, "success");
                    metrics::record_call(self.service, method, start);
                    tracing::debug!(endpoint = %endpoint, attempt = attempts, method, "Call succeeded");
                    return Ok(value);
                }
                Err(failure) => {
                    self.health.mark_dead(&endpoint);
                    metrics::record_attempt(self.service, method, failure.kind());
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt = attempts,
                        method,
                        error = %failure,
                        "Attempt failed, trying next endpoint"
                    );
                    self.last_failure.store(Some(Arc::new(failure.clone())));
                    last = Some(failure);
                }
            }
        }

        metrics::record_exhausted(self.service, method);
        metrics::record_call(self.service, method, start);
        tracing::error!(
            service = self.service,
            method,
            attempts,
            "All endpoints failed"
        );

        Err(Exhausted::new(attempts, last))
    }

    /// Last failure observed by any call on this invoker.
    pub fn last_failure(&self) -> Option<Failure> {
        self.last_failure.load_full().map(|failure| (*failure).clone())
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn pool(&self) -> &HostPool {
        &self.pool
    }

    pub fn health(&self) -> &Arc<HealthTracker> {
        &self.health
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.selector.policy()
    }

    pub fn number_of_retries(&self) -> usize {
        self.number_of_retries
    }
}
