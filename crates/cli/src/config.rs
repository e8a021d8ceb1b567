use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use nouns_core::{ContractAddresses, FileStore, KnownAddresses, ProposalDraft};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "nouns.toml";
pub const APP_DIR: &str = "nouns";
const ENV_EXAMPLE: &str = include_str!("./.env.example");
const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NounsConfig {
    pub contracts: ContractsConfig,
    /// Address to display name.
    pub bidders: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractsConfig {
    pub auction_house: Option<String>,
    pub governor: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse toml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid address for {field}: {value:?}")]
    InvalidAddress { field: String, value: String },
}

impl NounsConfig {
    pub fn contract_addresses(&self) -> Result<ContractAddresses, ConfigError> {
        let defaults = ContractAddresses::MAINNET;
        Ok(ContractAddresses {
            auction_house: parse_or(
                "contracts.auction_house",
                self.contracts.auction_house.as_deref(),
                defaults.auction_house,
            )?,
            governor: parse_or(
                "contracts.governor",
                self.contracts.governor.as_deref(),
                defaults.governor,
            )?,
            token: parse_or("contracts.token", self.contracts.token.as_deref(), defaults.token)?,
        })
    }

    /// Builtin labels extended with `[bidders]`; configured labels win.
    pub fn known_addresses(&self) -> Result<KnownAddresses, ConfigError> {
        let mut known = KnownAddresses::nouns_defaults();
        for (raw, label) in &self.bidders {
            let address = parse_address(&format!("bidders.{raw}"), raw)?;
            known.insert(address, label.clone());
        }
        Ok(known)
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_or(field: &str, value: Option<&str>, default: Address) -> Result<Address, ConfigError> {
    match value {
        Some(value) => parse_address(field, value),
        None => Ok(default),
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: impl AsRef<Path>) -> Result<NounsConfig, ConfigError> {
    read_toml(path.as_ref())
}

/// An explicit path must exist; the default location is optional.
pub fn load_config_or_default(path: Option<&Path>) -> Result<NounsConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => match app_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE)) {
            Some(path) if path.exists() => load_config(path),
            _ => Ok(NounsConfig::default()),
        },
    }
}

pub fn load_proposal_draft(path: impl AsRef<Path>) -> Result<ProposalDraft, ConfigError> {
    read_toml(path.as_ref())
}

pub fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn default_store_path() -> PathBuf {
    app_dir()
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
        .join(FileStore::FILE_NAME)
}

/// `--private-key`, then `PRIVATE_KEY`, then the bundled `.env.example`.
pub fn resolve_private_key(flag: Option<String>) -> Option<String> {
    flag.filter(|key| !key.trim().is_empty())
        .or_else(private_key_from_env)
}

fn private_key_from_env() -> Option<String> {
    env::var(PRIVATE_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| parse_env_example(PRIVATE_KEY_ENV))
}

fn parse_env_example(key: &str) -> Option<String> {
    ENV_EXAMPLE
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let mut parts = line.splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name == key && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use nouns_core::{BidderIdentity, NameResolver};

    fn example(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
    }

    #[test]
    fn parses_example_config() {
        let config = load_config(example("nouns.example.toml")).expect("should parse example config");

        assert_eq!(config.contract_addresses().unwrap(), ContractAddresses::MAINNET);

        let known = config.known_addresses().unwrap();
        let ones = BidderIdentity {
            address: address!("0x1111111111111111111111111111111111111111"),
            token_balance: None,
        };
        assert_eq!(known.resolve(&ones).as_deref(), Some("ones.eth"));
    }

    #[test]
    fn parses_example_proposal() {
        let draft = load_proposal_draft(example("proposal.example.toml")).unwrap();
        assert_eq!(draft.title, "Fund a Nouns billboard");
        assert_eq!(draft.actions.len(), 2);
        assert_eq!(draft.actions[0].value, "1.5");
        assert_eq!(draft.actions[0].calldata, "");
    }

    #[test]
    fn rejects_bad_contract_addresses() {
        let config: NounsConfig = toml::from_str("[contracts]\ntoken = \"nouns\"").unwrap();
        assert!(matches!(
            config.contract_addresses(),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn empty_config_uses_mainnet() {
        let config: NounsConfig = toml::from_str("").unwrap();
        assert_eq!(config.contract_addresses().unwrap(), ContractAddresses::default());
        assert_eq!(config.known_addresses().unwrap().len(), KnownAddresses::nouns_defaults().len());
    }

    #[test]
    fn resolves_private_key_from_flag_then_env() {
        // SAFETY: test process controls its own environment and uses a unique key.
        unsafe { env::set_var(PRIVATE_KEY_ENV, "0xfromenv") };
        assert_eq!(resolve_private_key(None).as_deref(), Some("0xfromenv"));
        assert_eq!(
            resolve_private_key(Some("0xfromflag".into())).as_deref(),
            Some("0xfromflag")
        );
        // SAFETY: test process controls its own environment and uses a unique key.
        unsafe { env::remove_var(PRIVATE_KEY_ENV) };

        // The bundled example ships without a key.
        assert_eq!(resolve_private_key(Some("  ".into())), None);
    }
}
