//! The per-block consensus pipeline (§4.1): parse → extract → type-cast →
//! validate → collide → canonicalize → commit → hash → snapshot.
//!
//! `Engine::process_block` is the single entry point a binary or test
//! drives; everything upstream of it (parsing, validation, collision,
//! hashing) is a pure function or a narrow trait precisely so this
//! function can stay a straight-line pipeline instead of a god-object.

use bincode::serde::encode_to_vec;

use crate::block_source::RawBlock;
use crate::epoch::EpochConfig;
use crate::types::op::{NameCreateFields, NameImportFields, NamespaceRevealFields};
use crate::types::{
    Address, ConsensusHash, HistoryRow, NameRecord, NamespaceLifecycle, NamespaceRecord, Op, PreorderHash,
    PreorderRecord,
};

use super::collision::{CollisionKey, CollisionSet};
use super::config::EngineLimits;
use super::error::FatalError;
use super::hashing::{consensus_hash, geometric_schedule, ops_hash};
use super::keychain::KeychainCache;
use super::snapshot::ConsensusSnapshot;
use super::store::{StoreReader, StoreWriter};
use super::validator::{classify_until_accept, ClassifyResult, ValidationContext};
use crate::validation::NamingValidator;

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

/// Summary of one block's processing, returned to the caller for logging
/// or test assertions.
#[derive(Debug)]
pub struct BlockResult {
    pub block_number: u64,
    pub accepted: usize,
    pub rejected: usize,
    pub collided: usize,
    pub consensus_hash: ConsensusHash,
}

/// Owns everything [`Engine::process_block`] needs across block boundaries:
/// the durable store, the append-only consensus snapshot, the keychain
/// cache, the announcer allow-list, and the epoch parameters.
pub struct Engine<S: StoreWriter> {
    store: S,
    snapshot: ConsensusSnapshot,
    keychains: KeychainCache,
    epoch: EpochConfig,
    announcers: Vec<Address>,
    limits: EngineLimits,
    genesis_block: u64,
}

impl<S: StoreWriter> Engine<S> {
    pub fn new(
        store: S,
        snapshot: ConsensusSnapshot,
        epoch: EpochConfig,
        announcers: Vec<Address>,
        limits: EngineLimits,
        genesis_block: u64,
    ) -> Self {
        #[cfg(debug_assertions)]
        crate::types::op::static_assert_op_table();

        Engine {
            store,
            snapshot,
            keychains: KeychainCache::new(),
            epoch,
            announcers,
            limits,
            genesis_block,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the full pipeline for one block. Returns `Err` only for the
    /// [`FatalError`] conditions §7 requires a process abort for; every
    /// ordinary per-op rejection is absorbed into [`BlockResult::rejected`].
    pub fn process_block(&mut self, block: &RawBlock) -> Result<BlockResult, FatalError> {
        let mut candidates = crate::parser::extract_ops_from_block(&block.txs, block.block_number);
        if candidates.len() > self.limits.max_ops_per_block {
            tracing::warn!(
                block_number = block.block_number,
                extracted = candidates.len(),
                cap = self.limits.max_ops_per_block,
                "truncating candidate ops to the per-block cap"
            );
            candidates.truncate(self.limits.max_ops_per_block);
        }

        let mut accepted = Vec::new();
        let mut rejected = 0usize;
        let collisions = CollisionSet::new();

        for op in candidates {
            let mut ctx = ValidationContext {
                store: &self.store,
                history: &self.snapshot,
                collisions: &collisions,
                keychains: &mut self.keychains,
                epoch: &self.epoch,
                announcers: &self.announcers,
                block_number: block.block_number,
            };
            match classify_until_accept(op, &NamingValidator, &mut ctx)? {
                ClassifyResult::Accepted(op) => accepted.push(op),
                ClassifyResult::Rejected(reason) => {
                    rejected += 1;
                    tracing::debug!(block_number = block.block_number, %reason, "op rejected");
                }
            }
        }

        let mut collisions = CollisionSet::new();
        for (index, op) in accepted.iter().enumerate() {
            if let Some(key) = CollisionKey::for_op(op) {
                collisions.claim(key, index, op.opcode());
            }
        }

        let final_ops: Vec<Op> = accepted
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !collisions.is_collided(*index))
            .map(|(_, op)| op)
            .collect();
        let collided = collisions.collided_indices().len();

        for op in &final_ops {
            self.commit(op, block.block_number)?;
        }
        self.store.put_block_ops(block.block_number, &final_ops);

        let ops_digest = ops_hash(&final_ops);
        let schedule_hashes: Vec<ConsensusHash> = geometric_schedule(block.block_number, self.genesis_block)
            .into_iter()
            .filter_map(|block_number| self.snapshot.consensus_hash_at(block_number))
            .collect();
        let consensus_digest = consensus_hash(&ops_digest, &schedule_hashes);

        self.snapshot.append_block(block.block_number, &ops_digest, &consensus_digest)?;

        Ok(BlockResult {
            block_number: block.block_number,
            accepted: final_ops.len(),
            rejected,
            collided,
            consensus_hash: consensus_digest,
        })
    }

    fn commit(&mut self, op: &Op, block_number: u64) -> Result<(), FatalError> {
        match op {
            Op::NamePreorder(f) | Op::NamespacePreorder(f) => {
                self.store.put_preorder(PreorderRecord {
                    preorder_hash: f.preorder_hash,
                    sender: f.sender.clone(),
                    block_number,
                    op_fee: f.op_fee,
                    token_fee: f.token_fee,
                    consumed: false,
                });
                Ok(())
            }
            Op::NameRegistration(f) => self.commit_registration(f, block_number),
            Op::NameRenewal(f) => self.commit_renewal(f, block_number),
            Op::NameUpdate(f) => {
                let Some(mut record) = self.store.get_name_raw(&f.name) else {
                    return Err(FatalError::StoreCorrupted {
                        detail: format!("NAME_UPDATE committed for missing name {}", f.name),
                    });
                };
                record.value_hash = Some(f.value_hash);
                self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_UPDATE", &record)?;
                self.store.put_name(record);
                Ok(())
            }
            Op::NameTransfer(f) => {
                let Some(mut record) = self.store.get_name_raw(&f.name) else {
                    return Err(FatalError::StoreCorrupted {
                        detail: format!("NAME_TRANSFER committed for missing name {}", f.name),
                    });
                };
                record.owner_address = f.recipient_address;
                record.sender = f.sender.clone();
                if !f.keep_data {
                    record.value_hash = None;
                }
                self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_TRANSFER", &record)?;
                self.store.put_name(record);
                Ok(())
            }
            Op::NameRevoke(f) => {
                let Some(mut record) = self.store.get_name_raw(&f.name) else {
                    return Err(FatalError::StoreCorrupted {
                        detail: format!("NAME_REVOKE committed for missing name {}", f.name),
                    });
                };
                record.revoked = true;
                self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_REVOKE", &record)?;
                self.store.put_name(record);
                Ok(())
            }
            Op::NameImport(f) => self.commit_import(f, block_number),
            Op::NamespaceReveal(f) => self.commit_namespace_reveal(f, block_number),
            Op::NamespaceReady(f) => {
                let Some(mut record) = self.store.get_namespace(&f.namespace_id) else {
                    return Err(FatalError::StoreCorrupted {
                        detail: format!("NAMESPACE_READY committed for missing namespace {}", f.namespace_id),
                    });
                };
                record.lifecycle = NamespaceLifecycle::Ready;
                record.ready_block = Some(block_number);
                self.store.put_namespace(record);
                Ok(())
            }
            Op::Announce(f) => {
                tracing::info!(block_number, message_hash = %hex::encode(f.message_hash), "announcement");
                Ok(())
            }
        }
    }

    fn commit_registration(&mut self, f: &NameCreateFields, block_number: u64) -> Result<(), FatalError> {
        let preorder_hash =
            PreorderHash::compute(&f.name, &f.sender, &f.recipient_address, Some(&f.burn_address), f.token_fee);
        self.store.consume_preorder(&preorder_hash);

        let record = NameRecord {
            name: f.name.clone(),
            owner_address: f.recipient_address,
            sender: f.sender.clone(),
            value_hash: f.value_hash,
            first_registered: block_number,
            last_renewed: block_number,
            revoked: false,
            importer_address: None,
        };
        self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_REGISTRATION", &record)?;
        self.store.put_name(record);
        Ok(())
    }

    fn commit_renewal(&mut self, f: &NameCreateFields, block_number: u64) -> Result<(), FatalError> {
        let Some(mut record) = self.store.get_name_raw(&f.name) else {
            return Err(FatalError::StoreCorrupted {
                detail: format!("NAME_RENEWAL committed for missing name {}", f.name),
            });
        };
        record.last_renewed = block_number;
        record.owner_address = f.recipient_address;
        self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_RENEWAL", &record)?;
        self.store.put_name(record);
        Ok(())
    }

    fn commit_import(&mut self, f: &NameImportFields, block_number: u64) -> Result<(), FatalError> {
        let record = NameRecord {
            name: f.name.clone(),
            owner_address: f.recipient_address,
            sender: f.sender.clone(),
            value_hash: f.value_hash,
            first_registered: block_number,
            last_renewed: block_number,
            revoked: false,
            importer_address: Some(Address::from_script(&f.sender)),
        };
        self.append_history(&f.name, block_number, &f.meta.txid, f.meta.vtxindex, "NAME_IMPORT", &record)?;
        self.store.put_name(record);
        Ok(())
    }

    fn commit_namespace_reveal(&mut self, f: &NamespaceRevealFields, block_number: u64) -> Result<(), FatalError> {
        let preorder_hash = PreorderHash::compute(&f.namespace_id, &f.sender, &f.reveal_address, None, None);
        self.store.consume_preorder(&preorder_hash);

        let record = NamespaceRecord {
            namespace_id: f.namespace_id.clone(),
            reveal_address: f.reveal_address,
            reveal_block: block_number,
            ready_block: None,
            lifecycle: NamespaceLifecycle::Revealed,
            lifetime: f.lifetime,
            coeff: f.coeff,
            base: f.base,
            buckets: f.buckets,
            nonalpha_discount: f.nonalpha_discount,
            no_vowel_discount: f.no_vowel_discount,
            version_bits: f.version_bits,
        };
        self.store.put_namespace(record);
        Ok(())
    }

    fn append_history(
        &mut self,
        history_id: &str,
        block_number: u64,
        txid: &str,
        vtxindex: u32,
        op_label: &str,
        record: &NameRecord,
    ) -> Result<(), FatalError> {
        let record_snapshot = encode_to_vec(record, bincode_config()).map_err(|e| FatalError::StoreCorrupted {
            detail: format!("failed to snapshot {history_id} after {op_label}: {e}"),
        })?;
        let consensus_hash = self.snapshot.consensus_hash_at(block_number).unwrap_or_else(ConsensusHash::genesis);
        self.store.append_history(
            history_id,
            HistoryRow {
                history_id: history_id.to_string(),
                block_number,
                vtxindex,
                op: op_label.to_string(),
                txid: txid.to_string(),
                consensus_hash,
                record_snapshot,
            },
        );
        Ok(())
    }
}
