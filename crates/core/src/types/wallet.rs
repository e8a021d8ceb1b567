use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Local mirror of the wallet session, kept for display between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletSession {
    #[serde(with = "optional_address")]
    pub address: Option<Address>,
    pub is_connected: bool,
    #[serde(rename = "balance")]
    pub balance_display: String,
    #[serde(rename = "nounsOwned")]
    pub owned_token_ids: Vec<u64>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self {
            address: None,
            is_connected: false,
            balance_display: "0.00".to_string(),
            owned_token_ids: Vec::new(),
        }
    }
}

// Stored as a plain string; empty means no account.
mod optional_address {
    use alloy::primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Address>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(address) => s.serialize_str(&address.to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Address>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}
