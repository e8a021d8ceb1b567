use alloy::{
    consensus::TxReceipt,
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use nouns_abi::{INounsAuctionHouse, INounsDAOLogic};
use tracing::info;

use crate::{
    chain::ContractAddresses,
    error::SubmitError,
    types::{
        action::{
            CastVoteInput, CastVoteResult, CreateProposalResult, PlaceBidInput, PlaceBidResult,
            PreparedProposal,
        },
        primitives::ProposalId,
    },
};

pub const BID_GAS_LIMIT: u64 = 150_000;
pub const VOTE_GAS_LIMIT: u64 = 150_000;
pub const VOTE_WITH_REASON_GAS_LIMIT: u64 = 200_000;
pub const PROPOSE_GAS_LIMIT: u64 = 300_000;

const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Sends the three write paths through a signing provider and waits for inclusion.
pub struct TransactionSubmitter<P>
where
    P: Provider + Clone,
{
    provider: P,
    contracts: ContractAddresses,
    confirmations: u64,
}

impl<P> TransactionSubmitter<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, contracts: ContractAddresses) -> Self {
        Self {
            provider,
            contracts,
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    pub async fn place_bid(&self, input: PlaceBidInput) -> Result<PlaceBidResult, SubmitError> {
        let house = INounsAuctionHouse::new(self.contracts.auction_house, &self.provider);

        let pending = house
            .createBid(input.noun_id.as_u256())
            .value(input.amount.as_u256())
            .gas(BID_GAS_LIMIT)
            .send()
            .await?;
        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        info!(noun_id = %input.noun_id, tx = %receipt.transaction_hash, "bid placed");
        Ok(PlaceBidResult {
            noun_id: input.noun_id,
            amount: input.amount,
            tx_hash: receipt.transaction_hash,
        })
    }

    /// `castVoteWithReason` when a reason is given, plain `castVote` otherwise.
    pub async fn cast_vote(&self, input: CastVoteInput) -> Result<CastVoteResult, SubmitError> {
        let governor = INounsDAOLogic::new(self.contracts.governor, &self.provider);
        let proposal_id = input.proposal_id.as_u256();
        let support = input.support.as_u8();

        let pending = match input.reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => {
                governor
                    .castVoteWithReason(proposal_id, support, reason.to_string())
                    .gas(VOTE_WITH_REASON_GAS_LIMIT)
                    .send()
                    .await?
            }
            _ => {
                governor
                    .castVote(proposal_id, support)
                    .gas(VOTE_GAS_LIMIT)
                    .send()
                    .await?
            }
        };
        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        info!(proposal = %input.proposal_id, support = %input.support, tx = %receipt.transaction_hash, "vote cast");
        Ok(CastVoteResult {
            proposal_id: input.proposal_id,
            support: input.support,
            tx_hash: receipt.transaction_hash,
        })
    }

    pub async fn create_proposal(
        &self,
        proposal: PreparedProposal,
    ) -> Result<CreateProposalResult, SubmitError> {
        let governor = INounsDAOLogic::new(self.contracts.governor, &self.provider);

        let pending = governor
            .propose(
                proposal.targets,
                proposal.values,
                proposal.signatures,
                proposal.calldatas,
                proposal.description,
            )
            .gas(PROPOSE_GAS_LIMIT)
            .send()
            .await?;
        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        let proposal_id = created_proposal_id(&receipt);

        info!(?proposal_id, tx = %receipt.transaction_hash, "proposal submitted");
        Ok(CreateProposalResult {
            proposal_id,
            tx_hash: receipt.transaction_hash,
        })
    }
}

/// Id from the governor's `ProposalCreated` log, if the receipt carries one.
fn created_proposal_id(receipt: &TransactionReceipt) -> Option<ProposalId> {
    receipt.inner.as_receipt().and_then(|body| {
        body.logs()
            .iter()
            .find_map(|log| log.log_decode::<INounsDAOLogic::ProposalCreated>().ok())
            .map(|decoded| ProposalId::new(decoded.inner.data.id))
    })
}

fn ensure_success(receipt: &TransactionReceipt) -> Result<(), SubmitError> {
    let body = receipt
        .inner
        .as_receipt()
        .ok_or_else(|| SubmitError::Unknown("receipt has no body".to_string()))?;

    if !body.status() {
        return Err(SubmitError::Reverted {
            tx_hash: Some(receipt.transaction_hash),
            reason: format!("transaction {} reverted", receipt.transaction_hash),
        });
    }

    Ok(())
}
