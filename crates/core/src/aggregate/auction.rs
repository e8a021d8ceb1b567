use alloy::primitives::{Address, U256};

use crate::types::{
    auction::AuctionRecord,
    bid::BidRecord,
    primitives::{NounId, Wei},
};

use super::{
    Loadable,
    countdown::Countdown,
    names::{BidderIdentity, ResolverChain},
};

/// Fixed step above the current bid: 0.01 ETH.
pub const MIN_BID_INCREMENT: Wei = Wei::new(U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]));

pub const LOADING_LABEL: &str = "Loading…";
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const NO_BIDS_LABEL: &str = "No bids yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidSource {
    Indexer,
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentBid {
    pub amount: Wei,
    pub source: BidSource,
}

/// Everything the auction panel renders, derived from the latest inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionView {
    pub noun_id: Option<NounId>,
    pub current_bid: Option<CurrentBid>,
    pub current_bid_display: String,
    pub leading_bidder: Option<String>,
    pub countdown: Option<Countdown>,
    pub minimum_next_bid: Wei,
    pub is_ended: bool,
    pub settled: bool,
    pub chain_error: Option<String>,
    pub bids_error: Option<String>,
}

impl AuctionView {
    /// Bidding needs a loaded, unsettled auction with time left.
    pub fn can_bid(&self) -> bool {
        self.noun_id.is_some() && self.countdown.is_some() && !self.is_ended && !self.settled
    }

    pub fn minimum_next_bid_display(&self) -> String {
        self.minimum_next_bid.display(2)
    }

    pub fn countdown_display(&self) -> String {
        match (&self.countdown, self.chain_error.is_some()) {
            (Some(countdown), _) => countdown.to_string(),
            (None, true) => UNKNOWN_LABEL.to_string(),
            (None, false) => LOADING_LABEL.to_string(),
        }
    }
}

pub fn minimum_next_bid(current: Option<Wei>) -> Wei {
    match current {
        Some(amount) if !amount.is_zero() => amount.saturating_add(MIN_BID_INCREMENT),
        _ => MIN_BID_INCREMENT,
    }
}

/// Reconcile the chain snapshot with the indexed bid history.
///
/// The indexed list wins once it is loaded and non-empty; the chain snapshot
/// fills in while the list is empty, still loading, or failed.
pub fn derive_auction_view(
    auction: &Loadable<AuctionRecord>,
    bids: &Loadable<Vec<BidRecord>>,
    now: u64,
    names: &ResolverChain,
) -> AuctionView {
    let record = auction.loaded();

    let head = bids.loaded().and_then(|bids| bids.first());

    let (current_bid, bidder) = match (head, record) {
        (Some(bid), _) => (
            Some(CurrentBid {
                amount: bid.amount,
                source: BidSource::Indexer,
            }),
            Some(BidderIdentity {
                address: bid.bidder,
                token_balance: bid.bidder_token_balance,
            }),
        ),
        (None, Some(record)) if !record.amount.is_zero() => (
            Some(CurrentBid {
                amount: record.amount,
                source: BidSource::Chain,
            }),
            (record.bidder != Address::ZERO).then_some(BidderIdentity {
                address: record.bidder,
                token_balance: None,
            }),
        ),
        _ => (None, None),
    };

    let current_bid_display = match (&current_bid, auction) {
        (Some(bid), _) => format!("{} ETH", bid.amount.display(3)),
        (None, Loadable::Loaded(_)) => NO_BIDS_LABEL.to_string(),
        (None, Loadable::Failed(_)) if head.is_none() => UNKNOWN_LABEL.to_string(),
        (None, _) => LOADING_LABEL.to_string(),
    };

    let countdown = record.map(|record| Countdown::until(record.end_time, now));
    let is_ended = countdown.is_some_and(|countdown| countdown.is_zero());

    AuctionView {
        noun_id: record.map(|record| record.noun_id),
        minimum_next_bid: minimum_next_bid(current_bid.map(|bid| bid.amount)),
        current_bid,
        current_bid_display,
        leading_bidder: bidder.map(|identity| names.display_name(&identity)),
        countdown,
        is_ended,
        settled: record.is_some_and(|record| record.settled),
        chain_error: auction.error().map(str::to_string),
        bids_error: bids.error().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate::names::truncate_address, types::primitives::BlockNumber};
    use alloy::primitives::address;

    const NOW: u64 = 1_700_000_000;
    const ALICE: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const BOB: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

    fn eth(value: &str) -> Wei {
        Wei::parse_ether(value).unwrap()
    }

    fn record(amount: &str, bidder: Address, end_time: u64) -> AuctionRecord {
        AuctionRecord {
            noun_id: NounId::new(U256::from(900)),
            amount: eth(amount),
            start_time: NOW - 3_600,
            end_time,
            bidder,
            settled: false,
        }
    }

    fn bid(amount: &str, bidder: Address, block: u64, holdings: Option<u64>) -> BidRecord {
        BidRecord {
            id: format!("bid-{block}"),
            bidder,
            bidder_token_balance: holdings,
            amount: eth(amount),
            block_timestamp: NOW,
            block_number: BlockNumber::new(block),
            tx_index: 0,
        }
    }

    #[test]
    fn indexed_head_wins_over_a_stale_chain_snapshot() {
        let auction = Loadable::Loaded(record("4.0", BOB, NOW + 3_661));
        let bids = Loadable::Loaded(vec![
            bid("5.0", ALICE, 103, Some(2)),
            bid("4.5", BOB, 102, None),
            bid("4.0", BOB, 101, None),
        ]);

        let view = derive_auction_view(&auction, &bids, NOW, &ResolverChain::default());

        assert_eq!(
            view.current_bid,
            Some(CurrentBid {
                amount: eth("5.0"),
                source: BidSource::Indexer
            })
        );
        assert_eq!(view.current_bid_display, "5.000 ETH");
        assert_eq!(view.minimum_next_bid, eth("5.01"));
        assert_eq!(view.minimum_next_bid_display(), "5.01");
        assert_eq!(view.leading_bidder.as_deref(), Some("Noun Holder (2 Nouns)"));
        assert_eq!(view.countdown_display(), "01h 01m 01s");
        assert!(view.can_bid());
    }

    #[test]
    fn empty_bid_list_falls_back_to_the_chain() {
        let auction = Loadable::Loaded(record("4.0", BOB, NOW + 60));
        let view = derive_auction_view(&auction, &Loadable::Loaded(Vec::new()), NOW, &ResolverChain::default());

        assert_eq!(view.current_bid.map(|bid| bid.source), Some(BidSource::Chain));
        assert_eq!(view.current_bid_display, "4.000 ETH");
        assert_eq!(view.leading_bidder, Some(truncate_address(&BOB)));
        assert_eq!(view.bids_error, None);
    }

    #[test]
    fn indexer_failure_falls_back_with_an_error_flag() {
        let auction = Loadable::Loaded(record("4.0", BOB, NOW + 60));
        let bids = Loadable::Failed("HTTP error! status: 502".into());

        let view = derive_auction_view(&auction, &bids, NOW, &ResolverChain::default());

        assert_eq!(view.current_bid.map(|bid| bid.amount), Some(eth("4.0")));
        assert_eq!(view.bids_error.as_deref(), Some("HTTP error! status: 502"));
        assert_eq!(view.chain_error, None);
    }

    #[test]
    fn chain_failure_leaves_unknown_fields() {
        let auction = Loadable::Failed("rpc request failed".into());
        let view = derive_auction_view(&auction, &Loadable::Loading, NOW, &ResolverChain::default());

        assert_eq!(view.noun_id, None);
        assert_eq!(view.current_bid, None);
        assert_eq!(view.current_bid_display, UNKNOWN_LABEL);
        assert_eq!(view.countdown_display(), UNKNOWN_LABEL);
        assert_eq!(view.minimum_next_bid, MIN_BID_INCREMENT);
        assert!(view.chain_error.is_some());
        assert!(!view.can_bid());
    }

    #[test]
    fn no_bids_means_minimum_is_the_increment() {
        let auction = Loadable::Loaded(record("0", Address::ZERO, NOW + 60));
        let view = derive_auction_view(&auction, &Loadable::Loaded(Vec::new()), NOW, &ResolverChain::default());

        assert_eq!(view.current_bid_display, NO_BIDS_LABEL);
        assert_eq!(view.leading_bidder, None);
        assert_eq!(view.minimum_next_bid_display(), "0.01");
    }

    #[test]
    fn still_loading_shows_placeholders() {
        let view = derive_auction_view(&Loadable::Loading, &Loadable::Loading, NOW, &ResolverChain::default());
        assert_eq!(view.current_bid_display, LOADING_LABEL);
        assert_eq!(view.countdown_display(), LOADING_LABEL);
    }

    #[test]
    fn countdown_at_zero_ends_the_auction() {
        let auction = Loadable::Loaded(record("1.0", ALICE, NOW - 5));
        let view = derive_auction_view(&auction, &Loadable::Loading, NOW, &ResolverChain::default());

        assert!(view.is_ended);
        assert_eq!(view.countdown_display(), "00h 00m 00s");
        assert!(!view.can_bid());
    }
}
