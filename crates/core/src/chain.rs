use alloy::{
    primitives::{Address, U256, address},
    providers::{DynProvider, Provider, ProviderBuilder},
};
use nouns_abi::{INounsAuctionHouse, INounsDAOLogic, INounsToken};
use tracing::debug;

use crate::{
    error::ChainError,
    types::{
        auction::AuctionRecord,
        primitives::{BlockNumber, ProposalId, Wei},
        proposal::ProposalStatus,
    },
};

/// Upper bound on token ids enumerated per owner.
pub const MAX_OWNED_TOKENS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub auction_house: Address,
    pub governor: Address,
    pub token: Address,
}

impl ContractAddresses {
    pub const MAINNET: Self = Self {
        auction_house: address!("0x830BD73E4184ceF73443C15111a1DF14e495C706"),
        governor: address!("0x6f3E6272A167e8AcCb32072d08E0957F9c79223d"),
        token: address!("0x9C8fF314C9Bc7F6e59A9d9225Fb22946427eDC03"),
    };
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self::MAINNET
    }
}

/// Read-only access to the auction house, governor and token.
#[derive(Clone)]
pub struct ChainReader<P>
where
    P: Provider + Clone,
{
    provider: P,
    contracts: ContractAddresses,
}

pub(crate) fn parse_rpc_url(rpc_url: &str) -> Result<reqwest::Url, ChainError> {
    rpc_url
        .trim()
        .parse::<reqwest::Url>()
        .map_err(|_| ChainError::InvalidRpcUrl {
            url: rpc_url.to_string(),
        })
}

/// Build a type-erased, read-only HTTP provider for `rpc_url`.
pub fn connect_http(rpc_url: &str) -> Result<DynProvider, ChainError> {
    Ok(ProviderBuilder::new()
        .connect_http(parse_rpc_url(rpc_url)?)
        .erased())
}

impl ChainReader<DynProvider> {
    pub fn connect(rpc_url: &str, contracts: ContractAddresses) -> Result<Self, ChainError> {
        Ok(Self::new(connect_http(rpc_url)?, contracts))
    }
}

impl<P> ChainReader<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, contracts: ContractAddresses) -> Self {
        Self {
            provider,
            contracts,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub async fn fetch_auction(&self) -> Result<AuctionRecord, ChainError> {
        let house = INounsAuctionHouse::new(self.contracts.auction_house, &self.provider);
        let raw = house.auction().call().await?;
        let record = AuctionRecord::from(raw);
        debug!(noun_id = %record.noun_id, end_time = record.end_time, "fetched auction");
        Ok(record)
    }

    pub async fn current_block(&self) -> Result<BlockNumber, ChainError> {
        Ok(BlockNumber::new(self.provider.get_block_number().await?))
    }

    /// Native balance.
    pub async fn balance(&self, account: Address) -> Result<Wei, ChainError> {
        Ok(Wei::new(self.provider.get_balance(account).await?))
    }

    /// Number of Nouns held.
    pub async fn token_balance(&self, owner: Address) -> Result<U256, ChainError> {
        let token = INounsToken::new(self.contracts.token, &self.provider);
        Ok(token.balanceOf(owner).call().await?)
    }

    pub async fn owned_tokens(&self, owner: Address) -> Result<Vec<u64>, ChainError> {
        let count = self.token_balance(owner).await?;
        let count = count.saturating_to::<u64>().min(MAX_OWNED_TOKENS);
        if count == 0 {
            return Ok(Vec::new());
        }

        let token = INounsToken::new(self.contracts.token, &self.provider);
        let mut multicall = self.provider.multicall().dynamic();
        for index in 0..count {
            multicall = multicall.add_dynamic(token.tokenOfOwnerByIndex(owner, U256::from(index)));
        }

        let ids = multicall.aggregate().await?;
        Ok(ids.into_iter().map(|id| id.saturating_to::<u64>()).collect())
    }

    /// Delegated votes now, or at a past block.
    pub async fn voting_power(
        &self,
        account: Address,
        at_block: Option<BlockNumber>,
    ) -> Result<U256, ChainError> {
        let token = INounsToken::new(self.contracts.token, &self.provider);
        let votes = match at_block {
            Some(block) => {
                token
                    .getPriorVotes(account, U256::from(block.as_u64()))
                    .call()
                    .await?
            }
            None => token.getCurrentVotes(account).call().await?,
        };
        Ok(U256::from(votes))
    }

    pub async fn has_voted(&self, proposal: ProposalId, voter: Address) -> Result<bool, ChainError> {
        let governor = INounsDAOLogic::new(self.contracts.governor, &self.provider);
        let receipt = governor.getReceipt(proposal.as_u256(), voter).call().await?;
        Ok(receipt.hasVoted)
    }

    pub async fn proposal_state(&self, proposal: ProposalId) -> Result<ProposalStatus, ChainError> {
        let governor = INounsDAOLogic::new(self.contracts.governor, &self.provider);
        let state = governor.state(proposal.as_u256()).call().await?;
        Ok(ProposalStatus::from_chain_state(state))
    }
}
