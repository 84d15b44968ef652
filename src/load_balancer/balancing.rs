//! Balancing selection strategy.

use rand::Rng;

use crate::load_balancer::Selector;

/// Random-start selector.
/// Each call starts its scan at a uniformly random index so load spreads
/// across alive endpoints instead of piling onto the first one.
#[derive(Debug, Default)]
pub struct Balancing;

impl Balancing {
    pub fn new() -> Self {
        Self
    }
}

impl Selector for Balancing {
    fn start_index(&self, pool_size: usize) -> usize {
        if pool_size <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..pool_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_index_in_range() {
        let selector = Balancing::new();
        assert_eq!(selector.start_index(0), 0);
        assert_eq!(selector.start_index(1), 0);
        for _ in 0..1000 {
            assert!(selector.start_index(5) < 5);
        }
    }

    #[test]
    fn test_start_index_spreads() {
        let selector = Balancing::new();
        let mut seen = [0usize; 3];
        for _ in 0..3000 {
            seen[selector.start_index(3)] += 1;
        }
        // Roughly uniform: every index gets a meaningful share.
        for count in seen {
            assert!(count > 500, "distribution too skewed: {:?}", seen);
        }
    }
}
