use std::collections::HashMap;

use alloy::primitives::{Address, address};

/// What the resolvers know about a bidder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidderIdentity {
    pub address: Address,
    pub token_balance: Option<u64>,
}

pub trait NameResolver: Send + Sync {
    fn resolve(&self, bidder: &BidderIdentity) -> Option<String>;
}

/// Curated labels for well-known addresses.
#[derive(Debug, Clone, Default)]
pub struct KnownAddresses {
    labels: HashMap<Address, String>,
}

impl KnownAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nouns_defaults() -> Self {
        let mut known = Self::new();
        known.insert(address!("0x2573C60a6D127755aA2DC85e342F7da2378a0Cc5"), "nounders.eth");
        known.insert(address!("0xb1a32FC9F9D8b2cf86C068Cae13108809547ef71"), "nouns.wtf");
        known.insert(address!("0x0BC3807Ec262cB779b38D65b38158acC3bfede10"), "Nounders Multisig");
        known.insert(address!("0x830BD73E4184ceF73443C15111a1DF14e495C706"), "Nouns Foundation");
        // Not EIP-55 checksummed upstream; stored lowercase, matched by value.
        known.insert(address!("0x40d1141740d1c1b8e7b8b1a8c2c3c2b3f2d3e4f5"), "Nouns Treasury");
        known
    }

    pub fn insert(&mut self, address: Address, label: impl Into<String>) {
        self.labels.insert(address, label.into());
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = (Address, String)>) {
        self.labels.extend(other);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl NameResolver for KnownAddresses {
    fn resolve(&self, bidder: &BidderIdentity) -> Option<String> {
        self.labels.get(&bidder.address).cloned()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HolderLabel;

impl NameResolver for HolderLabel {
    fn resolve(&self, bidder: &BidderIdentity) -> Option<String> {
        match bidder.token_balance? {
            0 => None,
            1 => Some("Noun Holder (1 Noun)".to_string()),
            count => Some(format!("Noun Holder ({count} Nouns)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortAddress;

impl NameResolver for ShortAddress {
    fn resolve(&self, bidder: &BidderIdentity) -> Option<String> {
        Some(truncate_address(&bidder.address))
    }
}

/// `0x2573...0Cc5`
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Resolvers tried in order; the first name found wins.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn NameResolver>>,
}

impl ResolverChain {
    pub const UNKNOWN: &'static str = "Unknown bidder";

    pub fn new(resolvers: Vec<Box<dyn NameResolver>>) -> Self {
        Self { resolvers }
    }

    /// Known addresses, then holder label, then the shortened address.
    pub fn with_known(known: KnownAddresses) -> Self {
        Self::new(vec![
            Box::new(known),
            Box::new(HolderLabel),
            Box::new(ShortAddress),
        ])
    }

    pub fn display_name(&self, bidder: &BidderIdentity) -> String {
        if bidder.address == Address::ZERO {
            return Self::UNKNOWN.to_string();
        }

        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(bidder))
            .unwrap_or_else(|| Self::UNKNOWN.to_string())
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::with_known(KnownAddresses::nouns_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDER: Address = address!("0x1111111111111111111111111111111111111111");
    const NOUNDERS: Address = address!("0x2573C60a6D127755aA2DC85e342F7da2378a0Cc5");

    fn bidder(address: Address, token_balance: Option<u64>) -> BidderIdentity {
        BidderIdentity {
            address,
            token_balance,
        }
    }

    #[test]
    fn known_label_beats_holder_label() {
        let chain = ResolverChain::default();
        assert_eq!(chain.display_name(&bidder(NOUNDERS, Some(40))), "nounders.eth");
    }

    #[test]
    fn known_addresses_match_regardless_of_case() {
        let lower: Address = "0x2573c60a6d127755aa2dc85e342f7da2378a0cc5".parse().unwrap();
        assert_eq!(ResolverChain::default().display_name(&bidder(lower, None)), "nounders.eth");
    }

    #[test]
    fn treasury_resolves_from_its_mixed_case_form() {
        let treasury: Address = "0x40d1141740d1c1b8E7b8B1A8C2c3c2b3F2D3e4f5".parse().unwrap();
        assert_eq!(
            ResolverChain::default().display_name(&bidder(treasury, Some(12))),
            "Nouns Treasury"
        );
        assert_eq!(KnownAddresses::nouns_defaults().len(), 5);
    }

    #[test]
    fn holders_are_labelled_by_count() {
        let chain = ResolverChain::default();
        assert_eq!(chain.display_name(&bidder(HOLDER, Some(1))), "Noun Holder (1 Noun)");
        assert_eq!(chain.display_name(&bidder(HOLDER, Some(3))), "Noun Holder (3 Nouns)");
    }

    #[test]
    fn everyone_else_gets_a_short_address() {
        let chain = ResolverChain::default();
        assert_eq!(chain.display_name(&bidder(HOLDER, Some(0))), "0x1111...1111");
        assert_eq!(chain.display_name(&bidder(NOUNDERS, None)), "nounders.eth");
        assert_eq!(truncate_address(&NOUNDERS), "0x2573...0Cc5");
    }

    #[test]
    fn injected_table_extends_the_chain() {
        let mut known = KnownAddresses::new();
        known.insert(HOLDER, "ones.eth");
        let chain = ResolverChain::with_known(known);
        assert_eq!(chain.display_name(&bidder(HOLDER, Some(2))), "ones.eth");
        assert_eq!(chain.display_name(&bidder(NOUNDERS, None)), "0x2573...0Cc5");
    }
}
