//! `NAME_PREORDER` / `NAMESPACE_PREORDER` validation (§4.3).
//!
//! Preorders have almost nothing to validate against existing state: by
//! design they commit to a hidden identifier. The only cross-block check
//! is that the same `preorder_hash` isn't already live (someone else's
//! earlier, unconsumed preorder).

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::types::op::PreorderFields;

pub fn check(f: &PreorderFields, is_namespace: bool, ctx: &ValidationContext) -> CheckOutcome {
    if f.op_fee == 0 {
        return CheckOutcome::Reject(RejectReason::MalformedField { field: "op_fee" });
    }

    let deadline = if is_namespace {
        ctx.epoch.rules_at(ctx.block_number).reveal_deadline_blocks
    } else {
        ctx.epoch.rules_at(ctx.block_number).preorder_deadline_blocks
    };

    match ctx.store.get_preorder(&f.preorder_hash) {
        Some(existing) if existing.is_live(ctx.block_number, deadline) => {
            CheckOutcome::Reject(RejectReason::PreorderAlreadyLive)
        }
        _ => CheckOutcome::Accept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::collision::CollisionSet;
    use crate::consensus::keychain::KeychainCache;
    use crate::consensus::snapshot::ConsensusSnapshot;
    use crate::epoch::EpochConfig;
    use crate::storage::memory::InMemoryNameStore;
    use crate::types::op::OpMeta;
    use crate::types::{Hash160, PreorderHash, PreorderRecord, ScriptPubkey};
    use crate::consensus::store::StoreWriter;

    fn ctx<'a>(
        store: &'a InMemoryNameStore,
        snapshot: &'a ConsensusSnapshot,
        collisions: &'a CollisionSet,
        keychains: &'a mut KeychainCache,
        epoch: &'a EpochConfig,
    ) -> ValidationContext<'a> {
        ValidationContext {
            store,
            history: snapshot,
            collisions,
            keychains,
            epoch,
            announcers: &[],
            block_number: 100,
        }
    }

    fn dummy_fields(hash_byte: u8) -> PreorderFields {
        PreorderFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            preorder_hash: PreorderHash(Hash160([hash_byte; 20])),
            sender: ScriptPubkey(vec![]),
            burn_address: crate::types::Address(Hash160([1; 20])),
            op_fee: 1000,
            token_fee: None,
            token_units: None,
        }
    }

    #[test]
    fn fresh_preorder_hash_is_accepted() {
        let store = InMemoryNameStore::new();
        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let c = ctx(&store, &snapshot, &collisions, &mut keychains, &epoch);

        assert!(matches!(check(&dummy_fields(1), false, &c), CheckOutcome::Accept));
    }

    #[test]
    fn still_live_preorder_hash_is_rejected() {
        let mut store = InMemoryNameStore::new();
        store.put_preorder(PreorderRecord {
            preorder_hash: PreorderHash(Hash160([2; 20])),
            sender: ScriptPubkey(vec![]),
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
        let c = ctx(&store, &snapshot, &collisions, &mut keychains, &epoch);

        let outcome = check(&dummy_fields(2), false, &c);
        assert!(matches!(outcome, CheckOutcome::Reject(RejectReason::PreorderAlreadyLive)));
    }
}
