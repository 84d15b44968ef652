//! FailOver selection strategy.

use crate::load_balancer::Selector;

/// Priority-order selector.
/// Always starts at the first endpoint of the pool; later endpoints are
/// only reached when the earlier ones are dead.
#[derive(Debug, Default)]
pub struct FailOver;

impl FailOver {
    pub fn new() -> Self {
        Self
    }
}

impl Selector for FailOver {
    fn start_index(&self, _pool_size: usize) -> usize {
        0
    }
}
