use std::{fmt, str::FromStr};

use alloy::primitives::{Address, U256};

use crate::error::ValidationError;

use super::primitives::{BlockNumber, ProposalId};

/// Governance state as reported by the indexer (or the governor).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProposalStatus {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
    Vetoed,
    Other(String),
}

impl ProposalStatus {
    /// Exact match on the indexer's uppercase labels.
    pub fn from_label(label: &str) -> Self {
        match label {
            "PENDING" => Self::Pending,
            "ACTIVE" => Self::Active,
            "CANCELED" => Self::Canceled,
            "DEFEATED" => Self::Defeated,
            "SUCCEEDED" => Self::Succeeded,
            "QUEUED" => Self::Queued,
            "EXPIRED" => Self::Expired,
            "EXECUTED" => Self::Executed,
            "VETOED" => Self::Vetoed,
            other => Self::Other(other.to_string()),
        }
    }

    /// `NounsDAOLogic.state()` ordinal.
    pub fn from_chain_state(state: u8) -> Self {
        match state {
            0 => Self::Pending,
            1 => Self::Active,
            2 => Self::Canceled,
            3 => Self::Defeated,
            4 => Self::Succeeded,
            5 => Self::Queued,
            6 => Self::Expired,
            7 => Self::Executed,
            8 => Self::Vetoed,
            9 => Self::Other("OBJECTION_PERIOD".into()),
            10 => Self::Other("UPDATABLE".into()),
            other => Self::Other(format!("STATE_{other}")),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Canceled => "CANCELED",
            Self::Defeated => "DEFEATED",
            Self::Succeeded => "SUCCEEDED",
            Self::Queued => "QUEUED",
            Self::Expired => "EXPIRED",
            Self::Executed => "EXECUTED",
            Self::Vetoed => "VETOED",
            Self::Other(label) => label,
        }
    }

    pub fn collapse(&self) -> CollapsedStatus {
        match self {
            Self::Active => CollapsedStatus::Active,
            Self::Succeeded | Self::Executed | Self::Queued => CollapsedStatus::Passed,
            Self::Canceled | Self::Defeated | Self::Expired => CollapsedStatus::Failed,
            other => CollapsedStatus::Unknown(other.label().to_string()),
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three display buckets, plus the raw label for anything unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollapsedStatus {
    Active,
    Passed,
    Failed,
    Unknown(String),
}

impl fmt::Display for CollapsedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Passed => f.write_str("passed"),
            Self::Failed => f.write_str("failed"),
            Self::Unknown(raw) => f.write_str(&raw.to_ascii_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Passed,
    Failed,
}

impl StatusFilter {
    pub fn matches(&self, status: &CollapsedStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => matches!(status, CollapsedStatus::Active),
            Self::Passed => matches!(status, CollapsedStatus::Passed),
            Self::Failed => matches!(status, CollapsedStatus::Failed),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            other => Err(format!(
                "unknown filter {other:?}, expected all, active, passed or failed"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub for_votes: U256,
    pub against_votes: U256,
    pub abstain_votes: U256,
    pub proposer: Address,
    pub end_block: Option<BlockNumber>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl VoteSupport {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl FromStr for VoteSupport {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "against" => Ok(Self::Against),
            "1" | "for" => Ok(Self::For),
            "2" | "abstain" => Ok(Self::Abstain),
            other => Err(ValidationError::InvalidSupport(other.to_string())),
        }
    }
}

impl fmt::Display for VoteSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Against => f.write_str("against"),
            Self::For => f.write_str("for"),
            Self::Abstain => f.write_str("abstain"),
        }
    }
}
