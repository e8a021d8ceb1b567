use std::time::Duration;

use crate::types::primitives::BlockNumber;

/// Average mainnet block time used for every block/time conversion.
pub const AVERAGE_BLOCK_SECONDS: u64 = 12;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const OPTIMISTIC_TICK_INTERVAL: Duration = Duration::from_secs(AVERAGE_BLOCK_SECONDS);

/// Locally tracked current block.
///
/// `poll_success` is authoritative and overwrites; `tick` advances by one block
/// between polls, and only once a real block has been seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockEstimate {
    current: Option<BlockNumber>,
}

impl BlockEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_success(&mut self, block: BlockNumber) {
        self.current = Some(block);
    }

    pub fn tick(&mut self) {
        if let Some(block) = self.current {
            self.current = Some(BlockNumber::new(block.as_u64().saturating_add(1)));
        }
    }

    pub fn current(&self) -> Option<BlockNumber> {
        self.current
    }

    /// Zero until the first poll lands.
    pub fn value(&self) -> u64 {
        self.current.map_or(0, |block| block.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_a_noop_before_the_first_poll() {
        let mut estimate = BlockEstimate::new();
        estimate.tick();
        estimate.tick();
        assert_eq!(estimate.current(), None);
        assert_eq!(estimate.value(), 0);
    }

    #[test]
    fn ticks_advance_between_polls() {
        let mut estimate = BlockEstimate::new();
        estimate.poll_success(BlockNumber::new(100));
        estimate.tick();
        estimate.tick();
        assert_eq!(estimate.value(), 102);
    }

    #[test]
    fn poll_overwrites_the_optimistic_value() {
        let mut estimate = BlockEstimate::new();
        estimate.poll_success(BlockNumber::new(100));
        estimate.tick();
        estimate.tick();
        estimate.tick();

        estimate.poll_success(BlockNumber::new(101));
        assert_eq!(estimate.value(), 101);
    }
}
