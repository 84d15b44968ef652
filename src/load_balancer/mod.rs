//! Endpoint selection subsystem.
//!
//! # Data Flow
//! ```text
//! Client construction:
//!     hosts string → pool.rs (parse, drop malformed, dedupe) → HostPool
//!
//! Every call:
//!     selector.rs (EndpointSelector::select)
//!     → start index from the policy's Selector:
//!         - balancing.rs (uniform random start)
//!         - fail_over.rs (always index 0)
//!     → walk the pool once from that index, yielding alive endpoints
//!     → scan done and pool[0] not yielded yet: yield pool[0]
//! ```
//!
//! # Design Decisions
//! - Selection is lazy; health is read when each candidate is produced
//! - A candidate ordering never repeats an endpoint
//! - Policy is fixed per client at construction

pub mod balancing;
pub mod endpoint;
pub mod fail_over;
pub mod pool;
pub mod selector;

use serde::{Deserialize, Serialize};

pub use endpoint::Endpoint;
pub use pool::HostPool;
pub use selector::{Candidates, EndpointSelector};

/// Decides where a candidate ordering starts.
pub trait Selector: Send + Sync + std::fmt::Debug {
    /// Index of the first endpoint to consider, in `0..pool_size`.
    fn start_index(&self, pool_size: usize) -> usize;
}

/// How a client spreads calls over its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Random starting endpoint per call.
    #[default]
    Balancing,
    /// Always prefer endpoints in pool order.
    FailOver,
}

impl SelectionPolicy {
    /// Parse a configuration value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balancing" => Some(SelectionPolicy::Balancing),
            "fail_over" | "failover" => Some(SelectionPolicy::FailOver),
            _ => None,
        }
    }

    pub fn selector(self) -> Box<dyn Selector> {
        match self {
            SelectionPolicy::Balancing => Box::new(balancing::Balancing::new()),
            SelectionPolicy::FailOver => Box::new(fail_over::FailOver::new()),
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionPolicy::Balancing => f.write_str("balancing"),
            SelectionPolicy::FailOver => f.write_str("fail_over"),
        }
    }
}
