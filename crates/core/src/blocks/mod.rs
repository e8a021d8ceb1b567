pub mod estimate;
pub mod producer;

pub use estimate::{AVERAGE_BLOCK_SECONDS, BlockEstimate, OPTIMISTIC_TICK_INTERVAL, POLL_INTERVAL};
pub use producer::{BlockProducer, BlockSource, BlockStream, BlockStreamItem, BoxBlockStream};
