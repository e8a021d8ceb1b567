use alloy::primitives::{Address, B256, Bytes, U256};
use serde::Deserialize;

use super::{
    primitives::{NounId, ProposalId, Wei},
    proposal::VoteSupport,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceBidInput {
    pub noun_id: NounId,
    pub amount: Wei,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastVoteInput {
    pub proposal_id: ProposalId,
    pub support: VoteSupport,
    pub reason: Option<String>,
}

/// One proposal action as typed by the user, before validation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProposalAction {
    pub target: String,
    /// Ether amount, `0` when empty.
    pub value: String,
    pub signature: String,
    /// Hex calldata, `0x` when empty.
    pub calldata: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    #[serde(rename = "action")]
    pub actions: Vec<ProposalAction>,
}

/// Arguments for `propose`, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedProposal {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Bytes>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct PlaceBidResult {
    pub noun_id: NounId,
    pub amount: Wei,
    pub tx_hash: B256,
}

#[derive(Debug, Clone)]
pub struct CastVoteResult {
    pub proposal_id: ProposalId,
    pub support: VoteSupport,
    pub tx_hash: B256,
}

#[derive(Debug, Clone)]
pub struct CreateProposalResult {
    pub proposal_id: Option<ProposalId>,
    pub tx_hash: B256,
}
