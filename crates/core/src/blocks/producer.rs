use std::{sync::Arc, time::Duration};

use alloy::providers::Provider;
use async_trait::async_trait;
use futures::{Stream, StreamExt, stream::BoxStream};
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::{chain::ChainReader, error::ChainError, types::primitives::BlockNumber};

pub type BlockStreamItem = Result<BlockNumber, ChainError>;

pub trait BlockStream: Stream<Item = BlockStreamItem> + Send + Unpin {}

impl<T> BlockStream for T where T: Stream<Item = BlockStreamItem> + Send + Unpin {}

pub type BoxBlockStream = BoxStream<'static, BlockStreamItem>;

/// Anything that can report the chain head.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn current_block(&self) -> Result<BlockNumber, ChainError>;
}

#[async_trait]
impl<P> BlockSource for ChainReader<P>
where
    P: Provider + Clone + Send + Sync,
{
    async fn current_block(&self) -> Result<BlockNumber, ChainError> {
        ChainReader::current_block(self).await
    }
}

/// Polls a [`BlockSource`] on a fixed period, yielding every result (errors included).
#[derive(Clone)]
pub struct BlockProducer {
    source: Arc<dyn BlockSource>,
    period: Duration,
}

impl BlockProducer {
    pub fn new(source: Arc<dyn BlockSource>, period: Duration) -> Self {
        Self { source, period }
    }

    /// First poll fires immediately.
    pub fn into_stream(self) -> BoxBlockStream {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        futures::stream::unfold(
            (self.source, interval),
            |(source, mut interval)| async move {
                interval.tick().await;
                let result = source.current_block().await;
                debug!(?result, "polled current block");
                Some((result, (source, interval)))
            },
        )
        .boxed()
    }
}
