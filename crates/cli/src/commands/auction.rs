use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use nouns_core::{
    AuctionRecord, AuctionView, BidRecord, BidderIdentity, Loadable, NounSeed, derive_auction_view,
};
use tracing::warn;

use crate::provider::AppContext;

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Raw inputs of the auction view, each possibly failed.
#[derive(Debug, Clone, Default)]
pub struct AuctionInputs {
    pub auction: Loadable<AuctionRecord>,
    pub bids: Loadable<Vec<BidRecord>>,
}

/// Chain snapshot first, then the bid history for that noun. Failures are kept, not raised.
pub async fn load_auction(ctx: &AppContext) -> AuctionInputs {
    let auction = match ctx.reader() {
        Ok(reader) => Loadable::from_result(reader.fetch_auction().await),
        Err(err) => Loadable::Failed(err.to_string()),
    };

    let bids = match auction.loaded() {
        Some(record) => Loadable::from_result(ctx.indexer().auction_bids(record.noun_id).await),
        None => Loadable::Loading,
    };

    if let Some(err) = auction.error() {
        warn!(%err, "auction snapshot unavailable");
    }
    if let Some(err) = bids.error() {
        warn!(%err, "bid history unavailable, using chain snapshot");
    }

    AuctionInputs { auction, bids }
}

pub fn view_of(ctx: &AppContext, inputs: &AuctionInputs) -> AuctionView {
    derive_auction_view(&inputs.auction, &inputs.bids, unix_now(), &ctx.names)
}

#[derive(Debug, Clone)]
pub struct BidLine {
    pub amount: String,
    pub bidder: String,
    pub block: u64,
}

#[derive(Debug, Clone)]
pub struct AuctionOutput {
    pub view: AuctionView,
    pub history: Vec<BidLine>,
    pub seed: Option<NounSeed>,
}

pub fn bid_lines(ctx: &AppContext, bids: &[BidRecord], limit: usize) -> Vec<BidLine> {
    bids.iter()
        .take(limit)
        .map(|bid| BidLine {
            amount: format!("{} ETH", bid.amount.display(3)),
            bidder: ctx.names.display_name(&BidderIdentity {
                address: bid.bidder,
                token_balance: bid.bidder_token_balance,
            }),
            block: bid.block_number.as_u64(),
        })
        .collect()
}

pub async fn auction(ctx: &AppContext, history: usize) -> AuctionOutput {
    let inputs = load_auction(ctx).await;
    let view = view_of(ctx, &inputs);

    let seed = match view.noun_id {
        Some(noun_id) => ctx.indexer().noun_seed(noun_id).await.unwrap_or_else(|err| {
            warn!(%err, "noun traits unavailable");
            None
        }),
        None => None,
    };

    let history = inputs
        .bids
        .loaded()
        .map(|bids| bid_lines(ctx, bids, history))
        .unwrap_or_default();

    AuctionOutput { view, history, seed }
}

impl fmt::Display for AuctionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = &self.view;
        match view.noun_id {
            Some(noun_id) => writeln!(f, "Noun {noun_id}")?,
            None => writeln!(f, "Noun ?")?,
        }

        writeln!(f, "  current bid     {}", view.current_bid_display)?;
        if let Some(bidder) = &view.leading_bidder {
            writeln!(f, "  leading bidder  {bidder}")?;
        }
        if view.settled {
            writeln!(f, "  status          settled")?;
        } else if view.is_ended {
            writeln!(f, "  status          ended, awaiting settlement")?;
        } else {
            writeln!(f, "  time left       {}", view.countdown_display())?;
        }
        writeln!(f, "  minimum bid     {} ETH", view.minimum_next_bid_display())?;

        if let Some(seed) = &self.seed {
            writeln!(
                f,
                "  traits          background {} body {} accessory {} head {} glasses {}",
                seed.background, seed.body, seed.accessory, seed.head, seed.glasses
            )?;
        }

        if let Some(err) = &view.chain_error {
            writeln!(f, "  ! chain: {err}")?;
        }
        if let Some(err) = &view.bids_error {
            writeln!(f, "  ! indexer: {err}")?;
        }

        if !self.history.is_empty() {
            writeln!(f, "Bids")?;
            for line in &self.history {
                writeln!(f, "  {:>12}  {:<28} block {}", line.amount, line.bidder, line.block)?;
            }
        }

        Ok(())
    }
}
