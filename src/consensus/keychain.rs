//! Import keychain (§4.6): the deterministic set of addresses authorized
//! to send `NAME_IMPORT` operations into a namespace, derived once at
//! `NAMESPACE_REVEAL` time from the revealer's own address.
//!
//! The keychain exists because imports bypass the preorder/collision
//! pipeline entirely (§4.3) — the protocol's only defense against an
//! arbitrary sender minting names for free is restricting who is allowed
//! to import at all, for the namespace's pre-launch bulk-migration window.

use std::collections::HashMap;

use crate::types::{Address, Hash160, NamespaceId};

/// How many addresses are derived ahead of time for a namespace's import
/// window. Generous enough to cover any realistic pre-launch migration
/// batch without re-deriving mid-import.
pub const KEYCHAIN_SIZE: usize = 300;

/// Derives the `index`-th import address for a namespace from its reveal
/// address: `address_i = Hash160(reveal_address || namespace_id ||
/// index_be)`. This is a chained-hash derivation rather than a real BIP32
/// HD path (no secp256k1 dependency carried for it) — deterministic and
/// namespace-scoped, which is the property the engine actually needs.
pub fn derive_import_address(reveal_address: &Address, namespace_id: &str, index: u32) -> Address {
    let mut buf = Vec::new();
    buf.extend_from_slice(reveal_address.0.as_bytes());
    buf.extend_from_slice(namespace_id.as_bytes());
    buf.extend_from_slice(&index.to_be_bytes());
    Address(Hash160::compute(&buf))
}

/// A namespace's full derived keychain, computed once and reused for every
/// `NAME_IMPORT` check during that namespace's pre-ready window.
#[derive(Clone, Debug)]
pub struct ImportKeychain {
    addresses: Vec<Address>,
}

impl ImportKeychain {
    pub fn derive(reveal_address: &Address, namespace_id: &str) -> Self {
        let addresses = (0..KEYCHAIN_SIZE as u32)
            .map(|i| derive_import_address(reveal_address, namespace_id, i))
            .collect();
        ImportKeychain { addresses }
    }

    pub fn authorizes(&self, sender: &Address) -> bool {
        self.addresses.contains(sender)
    }
}

/// Per-engine cache of derived keychains, so repeated imports into the
/// same namespace within a block don't re-derive 300 addresses each time.
#[derive(Default)]
pub struct KeychainCache {
    cache: HashMap<NamespaceId, ImportKeychain>,
}

impl KeychainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_derive(&mut self, namespace_id: &str, reveal_address: &Address) -> &ImportKeychain {
        self.cache
            .entry(namespace_id.to_string())
            .or_insert_with(|| ImportKeychain::derive(reveal_address, namespace_id))
    }
}
