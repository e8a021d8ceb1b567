use alloy::primitives::Address;
use nouns_abi::INounsAuctionHouse;

use super::primitives::{NounId, Wei};

/// On-chain snapshot of the running auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionRecord {
    pub noun_id: NounId,
    pub amount: Wei,
    pub start_time: u64,
    pub end_time: u64,
    pub bidder: Address,
    pub settled: bool,
}

impl AuctionRecord {
    pub fn has_bid(&self) -> bool {
        !self.amount.is_zero() && self.bidder != Address::ZERO
    }
}

impl From<INounsAuctionHouse::auctionReturn> for AuctionRecord {
    fn from(raw: INounsAuctionHouse::auctionReturn) -> Self {
        Self {
            noun_id: NounId::new(raw.nounId),
            amount: Wei::new(raw.amount),
            start_time: raw.startTime.saturating_to::<u64>(),
            end_time: raw.endTime.saturating_to::<u64>(),
            bidder: raw.bidder,
            settled: raw.settled,
        }
    }
}
