//! `NAMESPACE_REVEAL` / `NAMESPACE_READY` validation (§4.3, §4.5).
//!
//! Reveal and ready are the two lifecycle transitions every namespace must
//! pass through before it accepts name operations (§3). Both bind to a
//! live, unconsumed preorder's deadline window rather than to each other
//! directly: reveal must land within its namespace preorder's deadline,
//! and ready must land within reveal's own deadline.

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::epoch::is_valid_namespace_id;
use crate::types::op::{NamespaceReadyFields, NamespaceRevealFields};
use crate::types::{Address, PreorderHash};

pub fn check_reveal(f: &NamespaceRevealFields, ctx: &ValidationContext) -> CheckOutcome {
    if !is_valid_namespace_id(&f.namespace_id) {
        return CheckOutcome::Reject(RejectReason::MalformedField { field: "namespace_id" });
    }
    if ctx.store.get_namespace(&f.namespace_id).is_some() {
        return CheckOutcome::Reject(RejectReason::AlreadyExists);
    }

    let preorder_hash = PreorderHash::compute(&f.namespace_id, &f.sender, &f.reveal_address, None, None);
    let deadline = ctx.epoch.rules_at(ctx.block_number).reveal_deadline_blocks;
    match ctx.store.get_preorder(&preorder_hash) {
        Some(preorder) if preorder.is_live(ctx.block_number, deadline) => CheckOutcome::Accept,
        _ => CheckOutcome::Reject(RejectReason::NoMatchingPreorder),
    }
}

pub fn check_ready(f: &NamespaceReadyFields, ctx: &ValidationContext) -> CheckOutcome {
    let Some(namespace) = ctx.store.get_namespace(&f.namespace_id) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    if namespace.is_ready() {
        return CheckOutcome::Reject(RejectReason::AlreadyExists);
    }
    let sender_address = Address::from_script(&f.sender);
    if namespace.reveal_address != sender_address {
        return CheckOutcome::Reject(RejectReason::NotOwner);
    }
    let deadline = ctx.epoch.rules_at(ctx.block_number).ready_deadline_blocks;
    if ctx.block_number > namespace.reveal_block + deadline {
        return CheckOutcome::Reject(RejectReason::DeadlineExpired {
            opcode: crate::types::Opcode::NamespaceReady,
            deadline_block: namespace.reveal_block + deadline,
        });
    }
    CheckOutcome::Accept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::collision::CollisionSet;
    use crate::consensus::keychain::KeychainCache;
    use crate::consensus::snapshot::ConsensusSnapshot;
    use crate::consensus::store::StoreWriter;
    use crate::epoch::EpochConfig;
    use crate::storage::memory::InMemoryNameStore;
    use crate::types::op::OpMeta;
    use crate::types::{Hash160, NamespaceLifecycle, NamespaceRecord, PreorderRecord, ScriptPubkey};

    fn ctx<'a>(
        store: &'a InMemoryNameStore,
        snapshot: &'a ConsensusSnapshot,
        collisions: &'a CollisionSet,
        keychains: &'a mut KeychainCache,
        epoch: &'a EpochConfig,
        block_number: u64,
    ) -> ValidationContext<'a> {
        ValidationContext {
            store,
            history: snapshot,
            collisions,
            keychains,
            epoch,
            announcers: &[],
            block_number,
        }
    }

    #[test]
    fn reveal_with_matching_live_preorder_is_accepted() {
        let sender = ScriptPubkey(vec![1, 2, 3]);
        let reveal_address = Address(Hash160([4; 20]));
        let mut store = InMemoryNameStore::new();
        let hash = PreorderHash::compute("myns", &sender, &reveal_address, None, None);
        store.put_preorder(PreorderRecord {
            preorder_hash: hash,
            sender: sender.clone(),
            block_number: 99,
            op_fee: 1000,
            token_fee: None,
            consumed: false,
        });

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let c = ctx(&store, &snapshot, &collisions, &mut keychains, &epoch, 100);

        let f = NamespaceRevealFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            namespace_id: "myns".into(),
            reveal_address,
            sender,
            lifetime: 52_595,
            coeff: 1,
            base: 2,
            buckets: [1; 16],
            nonalpha_discount: 1,
            no_vowel_discount: 1,
            version_bits: 0,
        };
        assert!(matches!(check_reveal(&f, &c), CheckOutcome::Accept));
    }

    #[test]
    fn ready_by_the_revealer_before_its_deadline_is_accepted() {
        let sender = ScriptPubkey(vec![1, 2, 3]);
        let reveal_address = Address::from_script(&sender);
        let mut store = InMemoryNameStore::new();
        store.put_namespace(NamespaceRecord {
            namespace_id: "myns".into(),
            reveal_address,
            reveal_block: 100,
            ready_block: None,
            lifecycle: NamespaceLifecycle::Revealed,
            lifetime: 52_595,
            coeff: 1,
            base: 2,
            buckets: [1; 16],
            nonalpha_discount: 1,
            no_vowel_discount: 1,
            version_bits: 0,
        });

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let c = ctx(&store, &snapshot, &collisions, &mut keychains, &epoch, 200);

        let f = NamespaceReadyFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 200 },
            namespace_id: "myns".into(),
            sender,
        };
        assert!(matches!(check_ready(&f, &c), CheckOutcome::Accept));
    }

    #[test]
    fn ready_past_its_deadline_is_rejected() {
        let sender = ScriptPubkey(vec![1, 2, 3]);
        let reveal_address = Address::from_script(&sender);
        let mut store = InMemoryNameStore::new();
        store.put_namespace(NamespaceRecord {
            namespace_id: "myns".into(),
            reveal_address,
            reveal_block: 100,
            ready_block: None,
            lifecycle: NamespaceLifecycle::Revealed,
            lifetime: 52_595,
            coeff: 1,
            base: 2,
            buckets: [1; 16],
            nonalpha_discount: 1,
            no_vowel_discount: 1,
            version_bits: 0,
        });

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let c = ctx(&store, &snapshot, &collisions, &mut keychains, &epoch, 100 + 52_595 + 1);

        let f = NamespaceReadyFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 + 52_595 + 1 },
            namespace_id: "myns".into(),
            sender,
        };
        assert!(matches!(check_ready(&f, &c), CheckOutcome::Reject(RejectReason::DeadlineExpired { .. })));
    }
}
