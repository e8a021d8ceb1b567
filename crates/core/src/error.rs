use alloy::{
    contract,
    primitives::B256,
    providers::{MulticallError, PendingTransactionError},
    transports::{RpcError, TransportError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid rpc url {url:?}")]
    InvalidRpcUrl { url: String },

    #[error("rpc request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("contract call failed: {0}")]
    Contract(#[from] contract::Error),

    #[error("multicall failed: {0}")]
    Multicall(#[from] MulticallError),
}

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("indexer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    GraphQl(String),

    #[error("indexer response has no data")]
    MissingData,

    #[error("unexpected value for {field}: {value:?}")]
    Decode { field: &'static str, value: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("please connect your wallet first")]
    WalletNotConnected,

    #[error("auction has ended")]
    AuctionEnded,

    #[error("auction is not loaded")]
    AuctionUnavailable,

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("bid must be at least {minimum} ETH")]
    BidBelowMinimum { minimum: String },

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("please fill in title and description")]
    EmptyProposalFields,

    #[error("please add at least one valid action")]
    NoValidActions,

    #[error("invalid target address {0:?}")]
    InvalidTarget(String),

    #[error("invalid calldata {0:?}")]
    InvalidCalldata(String),

    #[error("you need to own at least one Noun to create a proposal")]
    NoVotingPower,

    #[error("invalid vote support {0:?}, expected for, against or abstain")]
    InvalidSupport(String),

    #[error("proposal is not active")]
    ProposalNotActive,

    #[error("you have already voted on this proposal")]
    AlreadyVoted,
}

/// Categorized failure of a submitted write.
#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("transaction rejected in wallet")]
    UserRejected,

    #[error("insufficient funds for value and gas")]
    InsufficientFunds,

    #[error("transaction reverted: {reason}")]
    Reverted {
        tx_hash: Option<B256>,
        reason: String,
    },

    #[error("transaction failed: {0}")]
    Unknown(String),
}

impl SubmitError {
    pub const USER_REJECTED_CODE: i64 = 4001;

    pub fn classify(code: Option<i64>, message: &str) -> Self {
        let lower = message.to_ascii_lowercase();

        if code == Some(Self::USER_REJECTED_CODE)
            || lower.contains("user rejected")
            || lower.contains("user denied")
        {
            return Self::UserRejected;
        }

        if lower.contains("insufficient funds") {
            return Self::InsufficientFunds;
        }

        if lower.contains("revert") {
            return Self::Reverted {
                tx_hash: None,
                reason: message.to_string(),
            };
        }

        Self::Unknown(message.to_string())
    }
}

impl From<contract::Error> for SubmitError {
    fn from(err: contract::Error) -> Self {
        match &err {
            contract::Error::TransportError(RpcError::ErrorResp(payload)) => {
                Self::classify(Some(payload.code), &payload.message)
            }
            other => Self::classify(None, &other.to_string()),
        }
    }
}

impl From<PendingTransactionError> for SubmitError {
    fn from(err: PendingTransactionError) -> Self {
        match &err {
            PendingTransactionError::TransportError(RpcError::ErrorResp(payload)) => {
                Self::classify(Some(payload.code), &payload.message)
            }
            other => Self::classify(None, &other.to_string()),
        }
    }
}

/// Errors raised by the signing wallet, mirroring the injected-provider codes.
#[derive(Debug, Error, PartialEq)]
pub enum WalletError {
    #[error("no wallet configured: pass --private-key or set PRIVATE_KEY")]
    NotInstalled,

    #[error("connection rejected, approve the connection and try again")]
    Rejected,

    #[error("connection request already pending, check your wallet")]
    RequestPending,

    #[error("no accounts found, make sure the wallet is unlocked")]
    NoAccounts,

    #[error("failed to connect wallet: {0}")]
    Other(String),
}

impl WalletError {
    pub const REJECTED_CODE: i64 = 4001;
    pub const PENDING_CODE: i64 = -32002;

    pub fn from_code(code: i64, message: &str) -> Self {
        match code {
            Self::REJECTED_CODE => Self::Rejected,
            Self::PENDING_CODE => Self::RequestPending,
            _ => Self::Other(message.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_wallet_rejection_by_code_and_message() {
        assert_eq!(
            SubmitError::classify(Some(4001), "whatever"),
            SubmitError::UserRejected
        );
        assert_eq!(
            SubmitError::classify(None, "MetaMask Tx Signature: User denied transaction signature."),
            SubmitError::UserRejected
        );
    }

    #[test]
    fn classifies_funds_and_reverts() {
        assert_eq!(
            SubmitError::classify(Some(-32000), "insufficient funds for gas * price + value"),
            SubmitError::InsufficientFunds
        );
        assert!(matches!(
            SubmitError::classify(Some(3), "execution reverted: Must send more than last bid by minBidIncrementPercentage amount"),
            SubmitError::Reverted { tx_hash: None, .. }
        ));
        assert_eq!(
            SubmitError::classify(Some(-32603), "nonce too low"),
            SubmitError::Unknown("nonce too low".into())
        );
    }

    #[test]
    fn wallet_codes_map_to_distinct_messages() {
        assert_eq!(WalletError::from_code(4001, ""), WalletError::Rejected);
        assert_eq!(WalletError::from_code(-32002, ""), WalletError::RequestPending);
        assert_eq!(
            WalletError::from_code(-1, "boom").to_string(),
            "failed to connect wallet: boom"
        );
        assert_ne!(
            WalletError::Rejected.to_string(),
            WalletError::RequestPending.to_string()
        );
    }
}
