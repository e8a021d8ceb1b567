use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use tracing::{debug, info};

use crate::{
    chain::{ChainReader, parse_rpc_url},
    error::{ChainError, Error, StoreError, ValidationError, WalletError},
    settings::store::{LocalStore, get_json, set_json},
    types::wallet::WalletSession,
};

pub const WALLET_KEY: &str = "nounsWallet";

const BALANCE_DISPLAY_DECIMALS: usize = 4;

/// Local signing wallet standing in for an injected browser provider.
#[derive(Debug, Clone)]
pub struct SignerWallet {
    signer: PrivateKeySigner,
}

impl SignerWallet {
    /// `None` or a blank key means no wallet is available.
    pub fn from_key(key: Option<&str>) -> Result<Self, WalletError> {
        let key = key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(WalletError::NotInstalled)?;

        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|err| WalletError::Other(err.to_string()))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The accounts this wallet exposes, primary first.
    pub fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address()])
    }

    /// Provider that signs and sends with this wallet.
    pub fn provider(&self, rpc_url: &str) -> Result<DynProvider, ChainError> {
        let wallet = EthereumWallet::from(self.signer.clone());
        Ok(ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(parse_rpc_url(rpc_url)?)
            .erased())
    }
}

/// Persisted mirror of the wallet session. The wallet itself stays authoritative.
#[derive(Clone)]
pub struct WalletMirror {
    store: Arc<dyn LocalStore>,
}

impl WalletMirror {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Last saved session, or a disconnected one.
    pub fn load(&self) -> WalletSession {
        get_json(self.store.as_ref(), WALLET_KEY).unwrap_or_else(WalletSession::disconnected)
    }

    pub fn save(&self, session: &WalletSession) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), WALLET_KEY, session)
    }

    pub async fn connect<P>(
        &self,
        wallet: &SignerWallet,
        reader: &ChainReader<P>,
    ) -> Result<WalletSession, Error>
    where
        P: Provider + Clone,
    {
        let accounts = wallet.request_accounts()?;
        let address = *accounts.first().ok_or(WalletError::NoAccounts)?;

        let balance = reader.balance(address).await?;
        let owned_token_ids = reader.owned_tokens(address).await?;

        let session = WalletSession {
            address: Some(address),
            is_connected: true,
            balance_display: balance.display(BALANCE_DISPLAY_DECIMALS),
            owned_token_ids,
        };
        self.save(&session)?;

        info!(%address, nouns = session.owned_token_ids.len(), "wallet connected");
        Ok(session)
    }

    /// The persisted session checked against `wallet`, with balance and holdings
    /// refreshed. Never connects on its own.
    pub async fn active_session<P>(
        &self,
        wallet: &SignerWallet,
        reader: &ChainReader<P>,
    ) -> Result<WalletSession, Error>
    where
        P: Provider + Clone,
    {
        let session = self.accounts_changed(&wallet.request_accounts()?)?;
        let address = match session.address {
            Some(address) if session.is_connected => address,
            _ => return Err(ValidationError::WalletNotConnected.into()),
        };

        let balance = reader.balance(address).await?;
        let refreshed = WalletSession {
            balance_display: balance.display(BALANCE_DISPLAY_DECIMALS),
            owned_token_ids: reader.owned_tokens(address).await?,
            ..session
        };
        self.save(&refreshed)?;
        Ok(refreshed)
    }

    pub fn disconnect(&self) -> Result<WalletSession, StoreError> {
        let session = WalletSession::disconnected();
        self.save(&session)?;
        Ok(session)
    }

    /// An empty list clears the mirror. A different primary account invalidates it.
    pub fn accounts_changed(&self, accounts: &[Address]) -> Result<WalletSession, StoreError> {
        let current = self.load();

        match accounts.first() {
            Some(address) if current.address == Some(*address) => Ok(current),
            _ => {
                debug!(?accounts, "wallet accounts changed, clearing session");
                self.store.remove(WALLET_KEY)?;
                Ok(WalletSession::disconnected())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{Bytes, U256},
        transports::mock::Asserter,
    };

    use crate::{chain::ContractAddresses, settings::store::MemoryStore};

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn mirror() -> (WalletMirror, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (WalletMirror::new(store.clone()), store)
    }

    fn connected(address: Address) -> WalletSession {
        WalletSession {
            address: Some(address),
            is_connected: true,
            balance_display: "1.2345".into(),
            owned_token_ids: vec![7, 9],
        }
    }

    #[test]
    fn missing_key_means_not_installed() {
        assert_eq!(SignerWallet::from_key(None).unwrap_err(), WalletError::NotInstalled);
        assert_eq!(SignerWallet::from_key(Some("  ")).unwrap_err(), WalletError::NotInstalled);
        assert!(matches!(
            SignerWallet::from_key(Some("nope")),
            Err(WalletError::Other(_))
        ));
    }

    #[test]
    fn exposes_the_signer_account() {
        let wallet = SignerWallet::from_key(Some(DEV_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.request_accounts().unwrap(), vec![wallet.address()]);
    }

    #[test]
    fn load_falls_back_to_disconnected() {
        let (mirror, store) = mirror();
        assert_eq!(mirror.load(), WalletSession::disconnected());

        store.set(WALLET_KEY, "{ not json").unwrap();
        assert_eq!(mirror.load(), WalletSession::disconnected());
    }

    #[test]
    fn empty_accounts_clear_the_mirror() {
        let (mirror, store) = mirror();
        mirror.save(&connected(Address::repeat_byte(1))).unwrap();

        let session = mirror.accounts_changed(&[]).unwrap();
        assert_eq!(session, WalletSession::disconnected());
        assert_eq!(store.get(WALLET_KEY), None);
    }

    #[test]
    fn same_account_keeps_the_session() {
        let (mirror, _) = mirror();
        let address = Address::repeat_byte(1);
        mirror.save(&connected(address)).unwrap();

        assert_eq!(mirror.accounts_changed(&[address]).unwrap(), connected(address));
        assert_eq!(
            mirror.accounts_changed(&[Address::repeat_byte(2)]).unwrap(),
            WalletSession::disconnected()
        );
    }

    fn mocked_reader() -> (ChainReader<DynProvider>, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        (ChainReader::new(provider, ContractAddresses::default()), asserter)
    }

    #[tokio::test]
    async fn disconnected_mirror_is_not_reconnected() {
        let (mirror, store) = mirror();
        let wallet = SignerWallet::from_key(Some(DEV_KEY)).unwrap();
        mirror.save(&connected(wallet.address())).unwrap();
        mirror.disconnect().unwrap();

        // Nothing queued: any chain read would fail with a transport error.
        let (reader, _asserter) = mocked_reader();
        let err = mirror.active_session(&wallet, &reader).await.unwrap_err();

        assert!(matches!(err, Error::Validation(ValidationError::WalletNotConnected)));
        assert_eq!(mirror.load(), WalletSession::disconnected());
        assert_eq!(store.get(WALLET_KEY), None);
    }

    #[tokio::test]
    async fn connected_mirror_gets_a_fresh_balance() {
        let (mirror, _) = mirror();
        let wallet = SignerWallet::from_key(Some(DEV_KEY)).unwrap();
        mirror.save(&connected(wallet.address())).unwrap();

        let (reader, asserter) = mocked_reader();
        asserter.push_success(&U256::from(2_500_000_000_000_000_000u128));
        asserter.push_success(&Bytes::from(U256::ZERO.to_be_bytes::<32>().to_vec()));

        let session = mirror.active_session(&wallet, &reader).await.unwrap();
        assert!(session.is_connected);
        assert_eq!(session.address, Some(wallet.address()));
        assert_eq!(session.balance_display, "2.5000");
        assert!(session.owned_token_ids.is_empty());
        assert_eq!(mirror.load(), session);
    }

    #[test]
    fn stored_shape_matches_the_dashboard() {
        let (mirror, store) = mirror();
        mirror.disconnect().unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.get(WALLET_KEY).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "address": "",
                "isConnected": false,
                "balance": "0.00",
                "nounsOwned": []
            })
        );
    }
}
