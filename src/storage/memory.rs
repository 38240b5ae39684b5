//! In-memory [`StoreReader`]/[`StoreWriter`] implementation, used by tests
//! and by any embedding binary that only needs ephemeral state (e.g. a
//! one-shot replay for inspection).

use std::collections::HashMap;

use crate::consensus::store::{StoreReader, StoreWriter};
use crate::types::{HistoryRow, NameRecord, NamespaceRecord, Op, PreorderHash, PreorderRecord};

#[derive(Default)]
pub struct InMemoryNameStore {
    names: HashMap<String, NameRecord>,
    namespaces: HashMap<String, NamespaceRecord>,
    preorders: HashMap<PreorderHash, PreorderRecord>,
    history: HashMap<String, Vec<HistoryRow>>,
    block_ops: HashMap<u64, Vec<Op>>,
}

impl InMemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreReader for InMemoryNameStore {
    fn get_name_raw(&self, name: &str) -> Option<NameRecord> {
        self.names.get(name).cloned()
    }

    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        self.namespaces.get(namespace_id).cloned()
    }

    fn get_preorder(&self, preorder_hash: &PreorderHash) -> Option<PreorderRecord> {
        self.preorders.get(preorder_hash).cloned()
    }

    fn history_of(&self, history_id: &str) -> Vec<HistoryRow> {
        self.history.get(history_id).cloned().unwrap_or_default()
    }

    fn all_names(&self) -> Vec<NameRecord> {
        self.names.values().cloned().collect()
    }

    fn all_history_ids(&self) -> Vec<String> {
        self.history.keys().cloned().collect()
    }

    fn get_all_ops_at_raw(&self, height: u64) -> Vec<Op> {
        self.block_ops.get(&height).cloned().unwrap_or_default()
    }
}

impl StoreWriter for InMemoryNameStore {
    fn put_preorder(&mut self, record: PreorderRecord) {
        self.preorders.insert(record.preorder_hash, record);
    }

    fn consume_preorder(&mut self, preorder_hash: &PreorderHash) {
        if let Some(record) = self.preorders.get_mut(preorder_hash) {
            record.consumed = true;
        }
    }

    fn put_name(&mut self, record: NameRecord) {
        self.names.insert(record.name.clone(), record);
    }

    fn put_namespace(&mut self, record: NamespaceRecord) {
        self.namespaces.insert(record.namespace_id.clone(), record);
    }

    fn append_history(&mut self, history_id: &str, row: HistoryRow) {
        self.history.entry(history_id.to_string()).or_default().push(row);
    }

    fn put_block_ops(&mut self, block_number: u64, ops: &[Op]) {
        self.block_ops.insert(block_number, ops.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, ConsensusHash, Hash160};

    fn dummy_name(name: &str) -> NameRecord {
        NameRecord {
            name: name.to_string(),
            owner_address: Address(Hash160([1; 20])),
            sender: crate::types::ScriptPubkey(vec![]),
            value_hash: None,
            first_registered: 100,
            last_renewed: 100,
            revoked: false,
            importer_address: None,
        }
    }

    #[test]
    fn put_then_get_name_roundtrips() {
        let mut store = InMemoryNameStore::new();
        store.put_name(dummy_name("foo.test"));
        assert_eq!(store.get_name_raw("foo.test").unwrap().name, "foo.test");
        assert!(store.get_name_raw("bar.test").is_none());
    }

    #[test]
    fn consuming_a_preorder_marks_it_consumed() {
        let mut store = InMemoryNameStore::new();
        let hash = PreorderHash(Hash160([5; 20]));
        store.put_preorder(PreorderRecord {
            preorder_hash: hash,
            sender: crate::types::ScriptPubkey(vec![]),
            block_number: 1,
            op_fee: 100,
            token_fee: None,
            consumed: false,
        });
        store.consume_preorder(&hash);
        assert!(store.get_preorder(&hash).unwrap().consumed);
    }

    #[test]
    fn history_accumulates_and_restore_picks_the_right_row() {
        let mut store = InMemoryNameStore::new();
        store.append_history(
            "foo.test",
            HistoryRow {
                history_id: "foo.test".into(),
                block_number: 100,
                vtxindex: 0,
                op: "NAME_REGISTRATION".into(),
                txid: "t1".into(),
                consensus_hash: ConsensusHash::genesis(),
                record_snapshot: vec![1],
            },
        );
        store.append_history(
            "foo.test",
            HistoryRow {
                history_id: "foo.test".into(),
                block_number: 200,
                vtxindex: 0,
                op: "NAME_UPDATE".into(),
                txid: "t2".into(),
                consensus_hash: ConsensusHash::genesis(),
                record_snapshot: vec![2],
            },
        );

        assert_eq!(store.restore_from_history("foo.test", 100), vec![vec![1]]);
        assert_eq!(store.restore_from_history("foo.test", 200), vec![vec![2]]);
        assert_eq!(store.restore_from_history("foo.test", 150), Vec::<Vec<u8>>::new());
        assert_eq!(store.restore_from_history("foo.test", 50), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn restore_from_history_returns_every_row_at_the_same_block() {
        let mut store = InMemoryNameStore::new();
        for vtxindex in 0..2u32 {
            store.append_history(
                "foo.test",
                HistoryRow {
                    history_id: "foo.test".into(),
                    block_number: 100,
                    vtxindex,
                    op: "NAME_UPDATE".into(),
                    txid: format!("t{vtxindex}"),
                    consensus_hash: ConsensusHash::genesis(),
                    record_snapshot: vec![vtxindex as u8],
                },
            );
        }
        assert_eq!(store.restore_from_history("foo.test", 100), vec![vec![0], vec![1]]);
    }

    #[test]
    fn put_block_ops_roundtrips_through_get_all_ops_at() {
        use crate::types::op::{AnnounceFields, OpMeta};
        use crate::types::ScriptPubkey;

        let mut store = InMemoryNameStore::new();
        let op = crate::types::Op::Announce(AnnounceFields {
            meta: OpMeta { txid: "t".into(), vtxindex: 0, block_number: 10 },
            message_hash: [0; 20],
            sender: ScriptPubkey(vec![]),
        });
        store.put_block_ops(10, std::slice::from_ref(&op));
        let fetched = store.get_all_ops_at(10, 0, 10);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].meta().txid, "t");
        assert!(store.get_all_ops_at(11, 0, 10).is_empty());
    }
}
