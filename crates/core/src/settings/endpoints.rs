use std::sync::Arc;

use tracing::info;

use crate::error::StoreError;

use super::store::LocalStore;

pub const DEFAULT_ETH_RPC: &str = "https://eth-mainnet.alchemyapi.io/v2/demo";
pub const DEFAULT_GRAPH_API: &str = "https://api.goldsky.com/api/public/project_cldf2o9pqtjbm49vm6ebkw02y/subgraphs/nouns-subgraph/prod/gn";

pub const ETH_RPC_KEY: &str = "ethRpc";
pub const GRAPH_API_KEY: &str = "graphApi";

/// The two network endpoints every reader resolves before a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub chain_rpc_url: String,
    pub indexer_url: String,
}

impl EndpointConfig {
    pub fn builtin() -> Self {
        Self {
            chain_rpc_url: DEFAULT_ETH_RPC.to_string(),
            indexer_url: DEFAULT_GRAPH_API.to_string(),
        }
    }

    /// Builtin defaults with non-empty overrides applied.
    pub fn with_overrides(chain_rpc_url: Option<String>, indexer_url: Option<String>) -> Self {
        let builtin = Self::builtin();
        Self {
            chain_rpc_url: non_empty(chain_rpc_url).unwrap_or(builtin.chain_rpc_url),
            indexer_url: non_empty(indexer_url).unwrap_or(builtin.indexer_url),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Partial update. `Some("")` clears the override for that field.
#[derive(Debug, Clone, Default)]
pub struct EndpointUpdate {
    pub chain_rpc_url: Option<String>,
    pub indexer_url: Option<String>,
}

#[derive(Clone)]
pub struct EndpointStore {
    store: Arc<dyn LocalStore>,
    defaults: EndpointConfig,
}

impl EndpointStore {
    pub fn new(store: Arc<dyn LocalStore>, defaults: EndpointConfig) -> Self {
        Self { store, defaults }
    }

    pub fn defaults(&self) -> &EndpointConfig {
        &self.defaults
    }

    /// Current value; resolved from the backing store on every call.
    pub fn get(&self) -> EndpointConfig {
        EndpointConfig {
            chain_rpc_url: self
                .override_for(ETH_RPC_KEY)
                .unwrap_or_else(|| self.defaults.chain_rpc_url.clone()),
            indexer_url: self
                .override_for(GRAPH_API_KEY)
                .unwrap_or_else(|| self.defaults.indexer_url.clone()),
        }
    }

    pub fn set(&self, update: EndpointUpdate) -> Result<(), StoreError> {
        if let Some(url) = update.chain_rpc_url {
            self.write(ETH_RPC_KEY, &url)?;
        }
        if let Some(url) = update.indexer_url {
            self.write(GRAPH_API_KEY, &url)?;
        }
        Ok(())
    }

    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(ETH_RPC_KEY)?;
        self.store.remove(GRAPH_API_KEY)
    }

    pub fn is_overridden(&self) -> (bool, bool) {
        (
            self.override_for(ETH_RPC_KEY).is_some(),
            self.override_for(GRAPH_API_KEY).is_some(),
        )
    }

    fn override_for(&self, key: &str) -> Option<String> {
        non_empty(self.store.get(key))
    }

    fn write(&self, key: &str, url: &str) -> Result<(), StoreError> {
        let url = url.trim();
        if url.is_empty() {
            info!(key, "endpoint override cleared");
            self.store.remove(key)
        } else {
            info!(key, url, "endpoint override saved");
            self.store.set(key, url)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
