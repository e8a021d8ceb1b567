use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    error::IndexerError,
    types::{
        bid::{BidRecord, sort_bids},
        primitives::{BlockNumber, NounId, ProposalId, Wei},
        proposal::{ProposalRecord, ProposalStatus},
    },
};

pub const BID_HISTORY_QUERY: &str = r#"
  query AuctionBids($nounId: String!) {
    auction(id: $nounId) {
      id
      bids(orderBy: amount, orderDirection: desc, first: 20) {
        id
        bidder {
          id
          tokenBalance
        }
        amount
        blockTimestamp
        blockNumber
        txIndex
      }
    }
  }
"#;

pub const PROPOSALS_QUERY: &str = r#"
  query Proposals($first: Int) {
    proposals(first: $first, orderBy: createdTimestamp, orderDirection: desc) {
      id
      title
      description
      status
      forVotes
      againstVotes
      abstainVotes
      endBlock
      proposer {
        id
      }
    }
  }
"#;

pub const NOUN_SEED_QUERY: &str = r#"
  query Noun($id: ID!) {
    noun(id: $id) {
      id
      seed {
        background
        body
        accessory
        head
        glasses
      }
    }
  }
"#;

/// Cheapest query every GraphQL server answers.
pub const INTROSPECTION_QUERY: &str = "{ __schema { queryType { name } } }";

pub const DEFAULT_PROPOSAL_PAGE: u32 = 10;

const GENERIC_GRAPHQL_ERROR: &str = "GraphQL query failed";

#[derive(Debug, Serialize)]
struct GraphRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> GraphResponse<T> {
    /// Any `errors` member fails the query, even an empty one.
    pub fn into_result(self) -> Result<T, IndexerError> {
        if let Some(errors) = self.errors {
            let message = errors
                .into_iter()
                .find_map(|error| error.message.filter(|message| !message.is_empty()))
                .unwrap_or_else(|| GENERIC_GRAPHQL_ERROR.to_string());
            return Err(IndexerError::GraphQl(message));
        }

        self.data.ok_or(IndexerError::MissingData)
    }
}

/// GraphQL reader for the Nouns subgraph.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl IndexerClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn query<T>(&self, query: &str, variables: Value) -> Result<T, IndexerError>
    where
        T: DeserializeOwned,
    {
        self.post(query, variables).await?.into_result()
    }

    /// The raw response envelope, with `errors` left for the caller.
    pub async fn post<T>(&self, query: &str, variables: Value) -> Result<GraphResponse<T>, IndexerError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "indexer returned an error status");
            return Err(IndexerError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Bids for one auction, highest first.
    pub async fn auction_bids(&self, noun_id: NounId) -> Result<Vec<BidRecord>, IndexerError> {
        let data: AuctionBidsData = self
            .query(BID_HISTORY_QUERY, json!({ "nounId": noun_id.to_string() }))
            .await?;

        let mut bids = data
            .auction
            .map(|auction| auction.bids)
            .unwrap_or_default()
            .into_iter()
            .map(BidRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sort_bids(&mut bids);

        debug!(%noun_id, count = bids.len(), "fetched bid history");
        Ok(bids)
    }

    /// Most recently created proposals first.
    pub async fn proposals(&self, first: u32) -> Result<Vec<ProposalRecord>, IndexerError> {
        let data: ProposalsData = self
            .query(PROPOSALS_QUERY, json!({ "first": first }))
            .await?;

        let proposals = data
            .proposals
            .into_iter()
            .map(ProposalRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = proposals.len(), "fetched proposals");
        Ok(proposals)
    }

    pub async fn noun_seed(&self, noun_id: NounId) -> Result<Option<NounSeed>, IndexerError> {
        let data: NounData = self
            .query(NOUN_SEED_QUERY, json!({ "id": noun_id.to_string() }))
            .await?;

        data.noun
            .and_then(|noun| noun.seed)
            .map(NounSeed::try_from)
            .transpose()
    }
}

/// Trait indices the token's descriptor renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NounSeed {
    pub background: u32,
    pub body: u32,
    pub accessory: u32,
    pub head: u32,
    pub glasses: u32,
}

#[derive(Debug, Deserialize)]
struct AuctionBidsData {
    auction: Option<RawAuction>,
}

#[derive(Debug, Deserialize)]
struct RawAuction {
    #[serde(default)]
    bids: Vec<RawBid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBid {
    id: String,
    bidder: RawAccount,
    amount: String,
    block_timestamp: String,
    block_number: String,
    tx_index: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    id: String,
    #[serde(default)]
    token_balance: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProposalsData {
    #[serde(default)]
    proposals: Vec<RawProposal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProposal {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    status: String,
    for_votes: String,
    against_votes: String,
    abstain_votes: String,
    #[serde(default)]
    end_block: Option<String>,
    proposer: RawAccount,
}

#[derive(Debug, Deserialize)]
struct NounData {
    noun: Option<RawNoun>,
}

#[derive(Debug, Deserialize)]
struct RawNoun {
    seed: Option<RawSeed>,
}

#[derive(Debug, Deserialize)]
struct RawSeed {
    background: String,
    body: String,
    accessory: String,
    head: String,
    glasses: String,
}

fn decode_u256(field: &'static str, value: &str) -> Result<U256, IndexerError> {
    U256::from_str_radix(value, 10).map_err(|_| IndexerError::Decode {
        field,
        value: value.to_string(),
    })
}

fn decode_u64(field: &'static str, value: &str) -> Result<u64, IndexerError> {
    value.parse().map_err(|_| IndexerError::Decode {
        field,
        value: value.to_string(),
    })
}

fn decode_u32(field: &'static str, value: &str) -> Result<u32, IndexerError> {
    value.parse().map_err(|_| IndexerError::Decode {
        field,
        value: value.to_string(),
    })
}

fn decode_address(field: &'static str, value: &str) -> Result<Address, IndexerError> {
    value.parse().map_err(|_| IndexerError::Decode {
        field,
        value: value.to_string(),
    })
}

impl TryFrom<RawBid> for BidRecord {
    type Error = IndexerError;

    fn try_from(raw: RawBid) -> Result<Self, Self::Error> {
        let bidder_token_balance = raw
            .bidder
            .token_balance
            .as_deref()
            .map(|balance| decode_u64("bidder.tokenBalance", balance))
            .transpose()?;

        Ok(Self {
            bidder: decode_address("bidder.id", &raw.bidder.id)?,
            bidder_token_balance,
            amount: Wei::new(decode_u256("amount", &raw.amount)?),
            block_timestamp: decode_u64("blockTimestamp", &raw.block_timestamp)?,
            block_number: BlockNumber::new(decode_u64("blockNumber", &raw.block_number)?),
            tx_index: decode_u64("txIndex", &raw.tx_index)?,
            id: raw.id,
        })
    }
}

impl TryFrom<RawProposal> for ProposalRecord {
    type Error = IndexerError;

    fn try_from(raw: RawProposal) -> Result<Self, Self::Error> {
        let end_block = raw
            .end_block
            .as_deref()
            .map(|block| decode_u64("endBlock", block).map(BlockNumber::new))
            .transpose()?;

        Ok(Self {
            id: ProposalId::new(decode_u256("id", &raw.id)?),
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            status: ProposalStatus::from_label(&raw.status),
            for_votes: decode_u256("forVotes", &raw.for_votes)?,
            against_votes: decode_u256("againstVotes", &raw.against_votes)?,
            abstain_votes: decode_u256("abstainVotes", &raw.abstain_votes)?,
            proposer: decode_address("proposer.id", &raw.proposer.id)?,
            end_block,
        })
    }
}

impl TryFrom<RawSeed> for NounSeed {
    type Error = IndexerError;

    fn try_from(raw: RawSeed) -> Result<Self, Self::Error> {
        Ok(Self {
            background: decode_u32("seed.background", &raw.background)?,
            body: decode_u32("seed.body", &raw.body)?,
            accessory: decode_u32("seed.accessory", &raw.accessory)?,
            head: decode_u32("seed.head", &raw.head)?,
            glasses: decode_u32("seed.glasses", &raw.glasses)?,
        })
    }
}
