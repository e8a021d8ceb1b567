use std::{path::PathBuf, sync::Arc};

use alloy::providers::DynProvider;
use nouns_core::{
    ChainError, ChainReader, ContractAddresses, EndpointConfig, EndpointStore, FileStore,
    IndexerClient, LocalStore, Preferences, ResolverChain, SignerWallet, TransactionSubmitter,
    WalletError, WalletMirror,
};

use crate::config::NounsConfig;

/// Shared state for one CLI invocation.
///
/// Readers are built on demand from the endpoint store so an updated endpoint
/// takes effect on the next request.
#[derive(Clone)]
pub struct AppContext {
    pub endpoints: EndpointStore,
    pub preferences: Preferences,
    pub wallet: WalletMirror,
    pub contracts: ContractAddresses,
    pub names: Arc<ResolverChain>,
    store_path: PathBuf,
    private_key: Option<String>,
}

impl AppContext {
    pub fn new(
        config: &NounsConfig,
        store_path: PathBuf,
        defaults: EndpointConfig,
        private_key: Option<String>,
    ) -> eyre::Result<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(&store_path));
        Ok(Self {
            endpoints: EndpointStore::new(store.clone(), defaults),
            preferences: Preferences::new(store.clone()),
            wallet: WalletMirror::new(store),
            contracts: config.contract_addresses()?,
            names: Arc::new(ResolverChain::with_known(config.known_addresses()?)),
            store_path,
            private_key,
        })
    }

    pub fn store_path(&self) -> &PathBuf {
        &self.store_path
    }

    pub fn reader(&self) -> Result<ChainReader<DynProvider>, ChainError> {
        ChainReader::connect(&self.endpoints.get().chain_rpc_url, self.contracts)
    }

    pub fn indexer(&self) -> IndexerClient {
        IndexerClient::new(self.endpoints.get().indexer_url)
    }

    pub fn signer(&self) -> Result<SignerWallet, WalletError> {
        SignerWallet::from_key(self.private_key.as_deref())
    }

    pub fn submitter(
        &self,
        signer: &SignerWallet,
    ) -> Result<TransactionSubmitter<DynProvider>, ChainError> {
        let provider = signer.provider(&self.endpoints.get().chain_rpc_url)?;
        Ok(TransactionSubmitter::new(provider, self.contracts))
    }
}
