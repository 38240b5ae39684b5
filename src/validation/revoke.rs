//! `NAME_REVOKE` validation (§4.3).
//!
//! The simplest mutation: no consensus-hash binding, just ownership. Once
//! accepted the name is permanently revoked — there is no un-revoke op.

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::types::op::NameRevokeFields;
use crate::types::Address;

pub fn check(f: &NameRevokeFields, ctx: &ValidationContext) -> CheckOutcome {
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
    use crate::types::NameRecord;

    #[test]
    fn owner_can_revoke_an_active_name() {
        let sender = crate::types::ScriptPubkey(vec![1, 2, 3]);
        let mut store = InMemoryNameStore::new();
        store.put_name(NameRecord {
            name: "alice.test".into(),
            owner_address: Address::from_script(&sender),
            sender: sender.clone(),
            value_hash: None,
            first_registered: 50,
            last_renewed: 50,
            revoked: false,
            importer_address: None,
        });

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let ctx = ValidationContext {
            store: &store,
            history: &snapshot,
            collisions: &collisions,
            keychains: &mut keychains,
            epoch: &epoch,
            announcers: &[],
            block_number: 100,
        };

        let f = NameRevokeFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            name: "alice.test".into(),
            sender,
        };
        assert!(matches!(check(&f, &ctx), CheckOutcome::Accept));
    }

    #[test]
    fn revoking_an_already_revoked_name_is_rejected() {
        let sender = crate::types::ScriptPubkey(vec![1, 2, 3]);
        let mut store = InMemoryNameStore::new();
        store.put_name(NameRecord {
            name: "alice.test".into(),
            owner_address: Address::from_script(&sender),
            sender: sender.clone(),
            value_hash: None,
            first_registered: 50,
            last_renewed: 50,
            revoked: true,
            importer_address: None,
        });

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ConsensusSnapshot::open(dir.path().join("s.log")).unwrap();
        let collisions = CollisionSet::new();
        let mut keychains = KeychainCache::new();
        let epoch = EpochConfig::default();
        let ctx = ValidationContext {
            store: &store,
            history: &snapshot,
            collisions: &collisions,
            keychains: &mut keychains,
            epoch: &epoch,
            announcers: &[],
            block_number: 100,
        };

        let f = NameRevokeFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 100 },
            name: "alice.test".into(),
            sender,
        };
        assert!(matches!(check(&f, &ctx), CheckOutcome::Reject(RejectReason::NameRevoked)));
    }
}
