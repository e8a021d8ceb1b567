use std::fmt;

use alloy::providers::Provider;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    chain::connect_http,
    indexer::{INTROSPECTION_QUERY, IndexerClient},
};

/// Outcome of testing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    /// No URL configured.
    Disconnected,
    Error(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::Disconnected => f.write_str("disconnected"),
            Self::Error(reason) => write!(f, "error ({reason})"),
        }
    }
}

/// `eth_blockNumber` must come back with a result.
pub async fn probe_rpc(url: &str) -> ConnectionStatus {
    if url.trim().is_empty() {
        return ConnectionStatus::Disconnected;
    }

    let provider = match connect_http(url) {
        Ok(provider) => provider,
        Err(err) => return ConnectionStatus::Error(err.to_string()),
    };

    match provider.get_block_number().await {
        Ok(block) => {
            debug!(url, block, "rpc probe succeeded");
            ConnectionStatus::Connected
        }
        Err(err) => ConnectionStatus::Error(err.to_string()),
    }
}

/// The introspection query must come back with `data`; `errors` alone fail it.
pub async fn probe_indexer(url: &str) -> ConnectionStatus {
    if url.trim().is_empty() {
        return ConnectionStatus::Disconnected;
    }

    let client = IndexerClient::new(url.trim());
    match client.post::<Value>(INTROSPECTION_QUERY, json!({})).await {
        Ok(response) if response.data.is_some() => {
            debug!(url, "indexer probe succeeded");
            ConnectionStatus::Connected
        }
        Ok(_) => ConnectionStatus::Error("response has no data".to_string()),
        Err(err) => ConnectionStatus::Error(err.to_string()),
    }
}
