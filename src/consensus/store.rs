//! Storage abstraction used by the consensus engine (§4.5).
//!
//! Split into [`StoreReader`] (shareable, read-only) and [`StoreWriter`]
//! (exclusive, mutating) rather than one trait mixing both, per the
//! REDESIGN FLAGS in `spec.md` §9: the original implementation gated every
//! write through a global-singleton mutex and a runtime `disposition`
//! check (`DISPOSITION_RW` vs `DISPOSITION_RO`), asserting (and
//! `os.abort()`-ing) if a write was attempted without it. Rust's borrow
//! checker enforces the same single-writer guarantee statically: only one
//! `&mut dyn StoreWriter` can exist at a time, so there is no runtime
//! disposition flag to check — attempting a write without exclusive access
//! is a compile error, not a consensus-time fatal abort.
//!
//! `StoreReader` only requires a backend to implement a handful of raw
//! primitives (`get_name_raw`, `all_names`, `all_history_ids`,
//! `get_all_ops_at_raw`, ...); every height-scoped, expiry-aware query
//! named in §4.5 is a default method built on top of them, so a new
//! backend gets the whole query surface for free.

use bincode::serde::decode_from_slice;

use crate::epoch::EpochRules;
use crate::types::{Address, HistoryRow, NameRecord, NamespaceRecord, Op, PreorderHash, PreorderRecord};

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

/// Read-only view of the naming-layer state. Freely shareable (`&self`).
pub trait StoreReader {
    /// Unfiltered lookup by name, regardless of expiry. Internal commit and
    /// mutation logic needs the record as actually stored; use
    /// [`Self::get_name`] for the expiry-aware read path.
    fn get_name_raw(&self, name: &str) -> Option<NameRecord>;
    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord>;
    fn get_preorder(&self, preorder_hash: &PreorderHash) -> Option<PreorderRecord>;

    /// Full history of a name or namespace, oldest first.
    fn history_of(&self, history_id: &str) -> Vec<HistoryRow>;

    /// Every name currently known to the store, backing the scan-based
    /// queries below. A backend with a secondary index is free to override
    /// those queries directly instead of relying on this.
    fn all_names(&self) -> Vec<NameRecord>;

    /// Every `history_id` (name or namespace ID) that has at least one
    /// history row, backing [`Self::get_historic_names_by_address`].
    fn all_history_ids(&self) -> Vec<String>;

    /// Raw per-block op log in commit (`vtxindex`) order, backing
    /// [`Self::get_all_ops_at`].
    fn get_all_ops_at_raw(&self, height: u64) -> Vec<Op>;

    /// Height-scoped, expiry-aware name lookup (§4.5). Expiry is computed,
    /// not stored: with `include_expired=false` this returns `None` once
    /// [`NameRecord::is_expired_at`] holds for `at_height`, matching the
    /// property `is_name_expired(N, H) <=> get_name(N, H, false) is None`.
    fn get_name(
        &self,
        name: &str,
        at_height: u64,
        include_expired: bool,
        epoch: &EpochRules,
    ) -> Option<NameRecord> {
        let record = self.get_name_raw(name)?;
        if record.first_registered > at_height {
            return None;
        }
        if include_expired {
            return Some(record);
        }
        let namespace_id = name.rsplit_once('.').map(|(_, ns)| ns)?;
        let namespace = self.get_namespace(namespace_id)?;
        if record.is_expired_at(&namespace, epoch, at_height) {
            return None;
        }
        Some(record)
    }

    /// `is_name_expired(N, H) <=> get_name(N, H, include_expired=false) is
    /// None` (§4.5), exposed directly so a caller already holding both
    /// records doesn't need to re-fetch through `get_name`.
    fn is_name_expired(
        &self,
        record: &NameRecord,
        namespace: &NamespaceRecord,
        epoch: &EpochRules,
        at_height: u64,
    ) -> bool {
        record.is_expired_at(namespace, epoch, at_height)
    }

    /// Names currently owned by `address` as of `at_height`.
    fn get_names_owned_by_address(
        &self,
        address: &Address,
        at_height: u64,
        include_expired: bool,
        epoch: &EpochRules,
    ) -> Vec<NameRecord> {
        self.all_names()
            .into_iter()
            .filter(|record| &record.owner_address == address)
            .filter(|record| self.get_name(&record.name, at_height, include_expired, epoch).is_some())
            .collect()
    }

    /// Every name `address` has ever owned at any point in its history,
    /// independent of current ownership or expiry, paginated for RPC
    /// consumption. Names are returned in lexicographic order for stable
    /// pagination.
    fn get_historic_names_by_address(&self, address: &Address, offset: usize, count: usize) -> Vec<String> {
        let mut names: Vec<String> = self
            .all_history_ids()
            .into_iter()
            .filter(|history_id| {
                self.history_of(history_id).iter().any(|row| {
                    decode_from_slice::<NameRecord, _>(&row.record_snapshot, bincode_config())
                        .map(|(record, _)| &record.owner_address == address)
                        .unwrap_or(false)
                })
            })
            .collect();
        names.sort();
        names.into_iter().skip(offset).take(count).collect()
    }

    /// Names within `namespace_id`, in stable lexicographic order, with
    /// offset/count pagination (§4.5).
    fn get_names_in_namespace(
        &self,
        namespace_id: &str,
        at_height: u64,
        include_expired: bool,
        epoch: &EpochRules,
        offset: usize,
        count: usize,
    ) -> Vec<NameRecord> {
        let mut names: Vec<NameRecord> = self
            .all_names()
            .into_iter()
            .filter(|record| record.name.rsplit_once('.').map(|(_, ns)| ns) == Some(namespace_id))
            .filter(|record| self.get_name(&record.name, at_height, include_expired, epoch).is_some())
            .collect();
        names.sort_by(|a, b| a.name.cmp(&b.name));
        names.into_iter().skip(offset).take(count).collect()
    }

    /// Ops committed at `height`, in `vtxindex` order, for recomputing the
    /// block's ops-hash (§4.1 step "hash"). Paginated like the other scan
    /// queries.
    fn get_all_ops_at(&self, height: u64, offset: usize, count: usize) -> Vec<Op> {
        let mut ops = self.get_all_ops_at_raw(height);
        ops.sort_by_key(|op| op.meta().vtxindex);
        ops.into_iter().skip(offset).take(count).collect()
    }

    /// Currently-live names whose `value_hash` matches `value_hash`.
    fn get_names_with_value_hash(
        &self,
        value_hash: &[u8; 20],
        at_height: u64,
        epoch: &EpochRules,
    ) -> Vec<NameRecord> {
        self.all_names()
            .into_iter()
            .filter(|record| record.value_hash.as_ref() == Some(value_hash))
            .filter(|record| self.get_name(&record.name, at_height, false, epoch).is_some())
            .collect()
    }

    /// SNV read path (§4.5): every intra-block state `history_id` passed
    /// through at exactly block `at_block`, in append order — not just the
    /// most recent snapshot at or before `at_block`. Matches the property
    /// `restore_from_history(current(E), H) ==
    /// sequence_of_in_block_states(E, H)`.
    fn restore_from_history(&self, history_id: &str, at_block: u64) -> Vec<Vec<u8>> {
        self.history_of(history_id)
            .into_iter()
            .filter(|row| row.block_number == at_block)
            .map(|row| row.record_snapshot)
            .collect()
    }
}

/// Exclusive, mutating view of the naming-layer state. Only the engine's
/// single writer ever holds one of these at a time.
pub trait StoreWriter: StoreReader {
    fn put_preorder(&mut self, record: PreorderRecord);
    fn consume_preorder(&mut self, preorder_hash: &PreorderHash);
    fn put_name(&mut self, record: NameRecord);
    fn put_namespace(&mut self, record: NamespaceRecord);
    fn append_history(&mut self, history_id: &str, row: HistoryRow);
    /// Persists the ops committed at `block_number`, in commit order, for
    /// later retrieval via `get_all_ops_at`.
    fn put_block_ops(&mut self, block_number: u64, ops: &[Op]);
}
