use alloy::primitives::Address;

use super::primitives::{BlockNumber, Wei};

/// One historical bid as captured by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRecord {
    pub id: String,
    pub bidder: Address,
    /// Nouns held by the bidder according to the indexer, when reported.
    pub bidder_token_balance: Option<u64>,
    pub amount: Wei,
    pub block_timestamp: u64,
    pub block_number: BlockNumber,
    pub tx_index: u64,
}

/// Sort bids the way the indexer is asked to return them: highest amount first,
/// most recent first among equal amounts.
pub fn sort_bids(bids: &mut [BidRecord]) {
    bids.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| b.block_number.cmp(&a.block_number))
            .then_with(|| b.tx_index.cmp(&a.tx_index))
    });
}
