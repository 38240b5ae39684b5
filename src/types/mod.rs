//! Core domain types shared across the engine: hashes, addresses, and the
//! opcode/operation/record types that make up the naming-layer consensus
//! state.
//!
//! As with the hash newtypes common to chain crates, the goal is to avoid
//! "naked" byte buffers in public APIs: every hash, address, and
//! identifier is its own type even though most are thin wrappers around
//! fixed-size byte arrays.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod op;
pub mod opcode;
pub mod record;

pub use op::{Op, OpFields};
pub use opcode::Opcode;
pub use record::{HistoryRow, NameRecord, NamespaceLifecycle, NamespaceRecord, PreorderRecord};

/// Length in bytes of a full SHA-256 digest.
pub const SHA256_LEN: usize = 32;

/// Length in bytes of a truncated consensus hash (128 bits).
pub const CONSENSUS_HASH_LEN: usize = 16;

/// Length in bytes of a `Hash160` (RIPEMD-160 of SHA-256), used for
/// preorder hashes and addresses, matching Bitcoin's `hash160`.
pub const HASH160_LEN: usize = 20;

/// Full 256-bit SHA-256 digest, used for the per-block ops-hash.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Sha256Digest(pub [u8; SHA256_LEN]);

impl Sha256Digest {
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let out = hasher.finalize();
        let mut bytes = [0u8; SHA256_LEN];
        bytes.copy_from_slice(&out);
        Sha256Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

/// Truncated SHA-256 digest (128 bits), used as the per-block consensus
/// hash and as the "name consensus hash" embedded in update/transfer ops.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ConsensusHash(pub [u8; CONSENSUS_HASH_LEN]);

impl ConsensusHash {
    /// `truncSHA256_128(data) = SHA256(data)[0..16]`.
    pub fn truncated_sha256(data: &[u8]) -> Self {
        let full = Sha256Digest::compute(data);
        let mut bytes = [0u8; CONSENSUS_HASH_LEN];
        bytes.copy_from_slice(&full.0[..CONSENSUS_HASH_LEN]);
        ConsensusHash(bytes)
    }

    pub fn genesis() -> Self {
        ConsensusHash([0u8; CONSENSUS_HASH_LEN])
    }

    pub fn as_bytes(&self) -> &[u8; CONSENSUS_HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != CONSENSUS_HASH_LEN {
            return None;
        }
        let mut out = [0u8; CONSENSUS_HASH_LEN];
        out.copy_from_slice(&bytes);
        Some(ConsensusHash(out))
    }
}

impl std::fmt::Debug for ConsensusHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConsensusHash({})", self.to_hex())
    }
}

/// `Hash160(data) = RIPEMD160(SHA256(data))`, Bitcoin's standard
/// pubkey/script digest. Used for preorder hashes and for recipient
/// addresses derived from a script-pubkey.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Hash160(pub [u8; HASH160_LEN]);

impl Hash160 {
    pub fn compute(data: &[u8]) -> Self {
        use ripemd::Ripemd160;

        let sha = Sha256Digest::compute(data);
        let mut hasher = Ripemd160::new();
        hasher.update(sha.0);
        let out = hasher.finalize();
        let mut bytes = [0u8; HASH160_LEN];
        bytes.copy_from_slice(&out);
        Hash160(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH160_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash160({})", self.to_hex())
    }
}

/// Preorder hash: `Hash160(name_or_nsid || sender_script || recipient_addr
/// [|| burn_addr] [|| token_amount_be])` per §6. Wrapped separately from
/// [`Hash160`] even though the representation is identical, so the two
/// concepts cannot be confused in signatures.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PreorderHash(pub Hash160);

impl PreorderHash {
    /// Builds the fields in the exact order required by the consensus
    /// protocol and hashes them. `token_amount_be` is only included when
    /// the namespace's version bits enable token payments (§6, §4.3).
    pub fn compute(
        name_or_nsid: &str,
        sender_script: &ScriptPubkey,
        recipient_addr: &Address,
        burn_addr: Option<&Address>,
        token_amount_be: Option<u64>,
    ) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(name_or_nsid.as_bytes());
        buf.extend_from_slice(&sender_script.0);
        buf.extend_from_slice(recipient_addr.0.as_bytes());
        if let Some(burn) = burn_addr {
            buf.extend_from_slice(burn.0.as_bytes());
        }
        if let Some(amount) = token_amount_be {
            buf.extend_from_slice(&amount.to_be_bytes());
        }
        PreorderHash(Hash160::compute(&buf))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl std::fmt::Debug for PreorderHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PreorderHash({})", self.to_hex())
    }
}

/// An on-chain recipient/owner address, derived from a script-pubkey via
/// [`Hash160`]. This is deliberately opaque about the underlying network
/// version byte / encoding (base58check vs. bech32): the engine only ever
/// compares addresses for equality and hashes them.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Address(pub Hash160);

impl Address {
    pub fn from_script(script: &ScriptPubkey) -> Self {
        Address(Hash160::compute(&script.0))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

/// Raw script-pubkey bytes of a transaction input/output, wrapped to avoid
/// naked `Vec<u8>` in public APIs (same rationale as a teacher's
/// `PublicKey`/`Signature` newtypes).
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScriptPubkey(pub Vec<u8>);

impl ScriptPubkey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for ScriptPubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScriptPubkey({})", hex::encode(&self.0))
    }
}

/// Fully-qualified name identifier, `label.namespace_id`.
///
/// Kept as an owned `String` rather than a split `(label, namespace_id)`
/// pair because the consensus protocol always treats it as a single
/// opaque string when hashing and comparing.
pub type NameId = String;

/// Namespace identifier: lowercase alphanumerics plus hyphen/underscore,
/// length-bounded (§3). Validity is enforced by [`crate::epoch::is_valid_namespace_id`].
pub type NamespaceId = String;
