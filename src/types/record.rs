//! Persisted state entities: names, namespaces, preorders, and the
//! append-only history each name/namespace accumulates.
//!
//! These are the rows the store actually keeps; contrast with
//! [`super::op::Op`], which is the transient, per-transaction input that
//! produces or mutates them.

use serde::{Deserialize, Serialize};

use crate::epoch::EpochRules;

use super::{Address, ConsensusHash, NameId, NamespaceId, PreorderHash, ScriptPubkey};

/// Lifecycle stage of a namespace, advanced strictly forward by
/// `NAMESPACE_REVEAL` then `NAMESPACE_READY` (§3, §4.5).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NamespaceLifecycle {
    Revealed,
    Ready,
}

/// A namespace's pricing curve and lifetime configuration, disclosed at
/// `NAMESPACE_REVEAL` and immutable afterward (§3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    pub namespace_id: NamespaceId,
    pub reveal_address: Address,
    pub reveal_block: u64,
    pub ready_block: Option<u64>,
    pub lifecycle: NamespaceLifecycle,
    pub lifetime: u32,
    pub coeff: u8,
    pub base: u8,
    pub buckets: [u8; 16],
    pub nonalpha_discount: u8,
    pub no_vowel_discount: u8,
    pub version_bits: u16,
}

impl NamespaceRecord {
    pub fn is_ready(&self) -> bool {
        matches!(self.lifecycle, NamespaceLifecycle::Ready)
    }

    /// Namespaces accept `NAME_PREORDER`/`NAME_REGISTRATION` only once
    /// `NAMESPACE_READY` has committed (§4.3).
    pub fn accepts_name_operations(&self) -> bool {
        self.is_ready()
    }
}

/// A registered name and its current owner/value binding (§3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: NameId,
    pub owner_address: Address,
    pub sender: ScriptPubkey,
    pub value_hash: Option<[u8; 20]>,
    pub first_registered: u64,
    pub last_renewed: u64,
    pub revoked: bool,
    /// Set only for names created by `NAME_IMPORT`, which are exempt from
    /// collision and preorder checks (§4.3).
    pub importer_address: Option<Address>,
}

impl NameRecord {
    /// A revoked name accepts no further operations except possibly being
    /// re-registered after its namespace-defined expiry (§3 edge cases).
    /// Does not by itself account for expiry — see [`Self::is_expired_at`].
    pub fn is_active(&self) -> bool {
        !self.revoked
    }

    /// Block height at which the name expires (§3 invariant 4):
    /// `max(namespace.ready_block, last_renewed) + lifetime * multiplier(H)`.
    /// `0` lifetime means the name never expires.
    pub fn expires_at(&self, namespace: &NamespaceRecord, epoch: &EpochRules) -> Option<u64> {
        if namespace.lifetime == 0 {
            return None;
        }
        let base = namespace.ready_block.unwrap_or(self.last_renewed).max(self.last_renewed);
        Some(base + namespace.lifetime as u64 * epoch.namespace_lifetime_multiplier as u64)
    }

    /// Whether the name has expired as of `at_height`, ignoring grace: once
    /// true, default (`include_expired=false`) read paths stop returning
    /// this record (§4.5, §8).
    pub fn is_expired_at(&self, namespace: &NamespaceRecord, epoch: &EpochRules, at_height: u64) -> bool {
        self.expires_at(namespace, epoch).is_some_and(|expiry| at_height >= expiry)
    }

    /// Whether `at_height` falls within the grace window following expiry,
    /// during which only the current owner may renew the name (§3, §8).
    pub fn is_in_grace_at(&self, namespace: &NamespaceRecord, epoch: &EpochRules, at_height: u64) -> bool {
        match self.expires_at(namespace, epoch) {
            Some(expiry) => {
                at_height >= expiry && at_height < expiry + epoch.namespace_lifetime_grace_period as u64
            }
            None => false,
        }
    }
}

/// A live (unmatched) preorder commitment, keyed by its `preorder_hash`
/// (§3). Consumed and removed once the matching creation op commits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreorderRecord {
    pub preorder_hash: PreorderHash,
    pub sender: ScriptPubkey,
    pub block_number: u64,
    pub op_fee: u64,
    pub token_fee: Option<u64>,
    pub consumed: bool,
}

impl PreorderRecord {
    /// Whether this preorder is still within its namespace's
    /// preorder-to-creation deadline window (§3, §6).
    pub fn is_live(&self, current_block: u64, deadline_blocks: u64) -> bool {
        !self.consumed && current_block <= self.block_number + deadline_blocks
    }
}

/// One committed mutation of a name or namespace, appended to its history
/// so that `restore_from_history` can answer "what did this record look
/// like as of block H" (§4.5's SNV read path).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub history_id: String,
    pub block_number: u64,
    pub vtxindex: u32,
    pub op: String,
    pub txid: String,
    pub consensus_hash: ConsensusHash,
    /// `bincode`-encoded `NameRecord`/`NamespaceRecord` as it stood
    /// immediately after this operation committed, so the SNV read path
    /// can answer "what did this record look like as of block H" by
    /// seeking to the last row at or before H and decoding it directly,
    /// without replaying every row from genesis.
    pub record_snapshot: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash160;

    fn dummy_address(byte: u8) -> Address {
        Address(Hash160([byte; 20]))
    }

    #[test]
    fn unready_namespace_rejects_name_operations() {
        let ns = NamespaceRecord {
            namespace_id: "test".into(),
            reveal_address: dummy_address(1),
            reveal_block: 100,
            ready_block: None,
            lifecycle: NamespaceLifecycle::Revealed,
            lifetime: 0,
            coeff: 0,
            base: 0,
            buckets: [0; 16],
            nonalpha_discount: 0,
            no_vowel_discount: 0,
            version_bits: 0,
        };
        assert!(!ns.accepts_name_operations());
    }

    fn dummy_namespace(lifetime: u32, ready_block: Option<u64>) -> NamespaceRecord {
        NamespaceRecord {
            namespace_id: "test".into(),
            reveal_address: dummy_address(1),
            reveal_block: 50,
            ready_block,
            lifecycle: NamespaceLifecycle::Ready,
            lifetime,
            coeff: 0,
            base: 0,
            buckets: [0; 16],
            nonalpha_discount: 0,
            no_vowel_discount: 0,
            version_bits: 0,
        }
    }

    fn rules(multiplier: u32, grace: u32) -> EpochRules {
        EpochRules {
            end_block: u64::MAX,
            namespace_lifetime_multiplier: multiplier,
            namespace_lifetime_grace_period: grace,
            preorder_deadline_blocks: 0,
            reveal_deadline_blocks: 0,
            ready_deadline_blocks: 0,
        }
    }

    #[test]
    fn zero_lifetime_namespace_never_expires_names() {
        let name = NameRecord {
            name: "foo.test".into(),
            owner_address: dummy_address(2),
            sender: ScriptPubkey(vec![]),
            value_hash: None,
            first_registered: 100,
            last_renewed: 100,
            revoked: false,
            importer_address: None,
        };
        let never = dummy_namespace(0, Some(90));
        assert_eq!(name.expires_at(&never, &rules(1, 0)), None);

        let ns = dummy_namespace(52_595, Some(90));
        assert_eq!(name.expires_at(&ns, &rules(1, 0)), Some(100 + 52_595));
    }

    #[test]
    fn expiry_uses_later_of_namespace_ready_and_last_renewed() {
        let name = NameRecord {
            name: "foo.test".into(),
            owner_address: dummy_address(2),
            sender: ScriptPubkey(vec![]),
            value_hash: None,
            first_registered: 100,
            last_renewed: 100,
            revoked: false,
            importer_address: None,
        };
        // namespace became ready after the name's last renewal: that later
        // height anchors expiry, not last_renewed.
        let ns = dummy_namespace(5, Some(200));
        assert_eq!(name.expires_at(&ns, &rules(1, 0)), Some(205));
        assert!(!name.is_expired_at(&ns, &rules(1, 0), 204));
        assert!(name.is_expired_at(&ns, &rules(1, 0), 205));
    }

    #[test]
    fn multiplier_scales_lifetime_and_grace_extends_renewability() {
        let name = NameRecord {
            name: "foo.test".into(),
            owner_address: dummy_address(2),
            sender: ScriptPubkey(vec![]),
            value_hash: None,
            first_registered: 100,
            last_renewed: 100,
            revoked: false,
            importer_address: None,
        };
        let ns = dummy_namespace(5, Some(90));
        let epoch = rules(2, 3);
        assert_eq!(name.expires_at(&ns, &epoch), Some(110));
        assert!(name.is_in_grace_at(&ns, &epoch, 110));
        assert!(name.is_in_grace_at(&ns, &epoch, 112));
        assert!(!name.is_in_grace_at(&ns, &epoch, 113));
    }

    #[test]
    fn preorder_expires_after_deadline() {
        let preorder = PreorderRecord {
            preorder_hash: PreorderHash(Hash160([9; 20])),
            sender: ScriptPubkey(vec![]),
            block_number: 100,
            op_fee: 1000,
            token_fee: None,
            consumed: false,
        };
        assert!(preorder.is_live(105, 10));
        assert!(!preorder.is_live(111, 10));
    }

    #[test]
    fn consumed_preorder_is_never_live() {
        let preorder = PreorderRecord {
            preorder_hash: PreorderHash(Hash160([9; 20])),
            sender: ScriptPubkey(vec![]),
            block_number: 100,
            op_fee: 1000,
            token_fee: None,
            consumed: true,
        };
        assert!(!preorder.is_live(100, 10));
    }
}
