//! `NAME_UPDATE` validation (§4.3, §4.4).
//!
//! Distinct from every other mutation in that its authorization isn't just
//! "sender owns the name" — it also has to prove the transaction was built
//! against some recent, real consensus state via the embedded
//! `name_consensus_hash` binding.

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::consensus::window::validate_binding;
use crate::types::op::NameUpdateFields;
use crate::types::Address;

pub fn check(f: &NameUpdateFields, ctx: &ValidationContext) -> CheckOutcome {
    let Some(existing) = ctx.store.get_name_raw(&f.name) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    if !existing.is_active() {
        return CheckOutcome::Reject(RejectReason::NameRevoked);
    }
    let sender_address = Address::from_script(&f.sender);
    if existing.owner_address != sender_address {
        return CheckOutcome::Reject(RejectReason::NotOwner);
    }

    let window = ctx.epoch.valid_tx_window;
    match validate_binding(ctx.history, &f.name, &f.name_consensus_hash, ctx.block_number, window) {
        Some(_) => CheckOutcome::Accept,
        None => CheckOutcome::Reject(RejectReason::StaleConsensusHash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::collision::CollisionSet;
    use crate::consensus::hashing::name_consensus_hash;
    use crate::consensus::keychain::KeychainCache;
    use crate::consensus::snapshot::ConsensusSnapshot;
    use crate::consensus::store::StoreWriter;
    use crate::epoch::EpochConfig;
    use crate::storage::memory::InMemoryNameStore;
    use crate::types::op::OpMeta;
    use crate::types::{ConsensusHash, Hash160, NameRecord, ScriptPubkey};
    use std::collections::HashMap;

    struct FakeHistory(HashMap<u64, ConsensusHash>);
    impl crate::consensus::window::ConsensusHashHistory for FakeHistory {
        fn consensus_hash_at(&self, block_number: u64) -> Option<ConsensusHash> {
            self.0.get(&block_number).copied()
        }
    }

    fn owned_name(sender: &ScriptPubkey) -> NameRecord {
        NameRecord {
            name: "alice.test".into(),
            owner_address: Address::from_script(sender),
            sender: sender.clone(),
            value_hash: None,
            first_registered: 50,
            last_renewed: 50,
            revoked: false,
            importer_address: None,
        }
    }

    #[test]
    fn update_with_valid_binding_is_accepted() {
        let sender = ScriptPubkey(vec![1, 2, 3]);
        let mut store = InMemoryNameStore::new();
        store.put_name(owned_name(&sender));

        let ch_99 = ConsensusHash::truncated_sha256(b"block-99");
        let history = FakeHistory(HashMap::from([(99, ch_99)]));
        let embedded = name_consensus_hash("alice.test", &ch_99);

        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let ctx = ValidationContext {
            store: &store,
            history: &history,
            collisions: &collisions,
            keychains: &mut keychains,
            epoch: &epoch,
            announcers: &[],
            block_number: 100,
        };

        let f = NameUpdateFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            name: "alice.test".into(),
            sender,
            name_consensus_hash: embedded,
            value_hash: [7; 20],
        };
        assert!(matches!(check(&f, &ctx), CheckOutcome::Accept));
    }

    #[test]
    fn update_with_stale_binding_is_rejected() {
        let sender = ScriptPubkey(vec![1, 2, 3]);
        let mut store = InMemoryNameStore::new();
        store.put_name(owned_name(&sender));

        let history = FakeHistory(HashMap::new());
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let ctx = ValidationContext {
            store: &store,
            history: &history,
            collisions: &collisions,
            keychains: &mut keychains,
            epoch: &epoch,
            announcers: &[],
            block_number: 100,
        };

        let f = NameUpdateFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            name: "alice.test".into(),
            sender,
            name_consensus_hash: ConsensusHash::genesis(),
            value_hash: [7; 20],
        };
        assert!(matches!(check(&f, &ctx), CheckOutcome::Reject(RejectReason::StaleConsensusHash)));
    }

    #[test]
    fn update_by_non_owner_is_rejected() {
        let owner = ScriptPubkey(vec![1, 2, 3]);
        let mut store = InMemoryNameStore::new();
        store.put_name(owned_name(&owner));

        let history = FakeHistory(HashMap::new());
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let ctx = ValidationContext {
            store: &store,
            history: &history,
            collisions: &collisions,
            keychains: &mut keychains,
            epoch: &epoch,
            announcers: &[],
            block_number: 100,
        };

        let f = NameUpdateFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            name: "alice.test".into(),
            sender: ScriptPubkey(vec![9, 9, 9]),
            name_consensus_hash: ConsensusHash::genesis(),
            value_hash: [7; 20],
        };
        assert!(matches!(check(&f, &ctx), CheckOutcome::Reject(RejectReason::NotOwner)));
    }
}
