//! RocksDB-backed [`StoreReader`]/[`StoreWriter`] implementation, the
//! durable store a long-running node uses (§4.5).
//!
//! Grounded on the teacher's `RocksDbBlockStore`: open a fixed set of
//! column families up front and fail loudly if one is missing, rather than
//! creating them lazily on first write.

use std::fmt;
use std::path::Path;

use bincode::serde::{decode_from_slice, encode_to_vec};
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::{Deserialize, Serialize};

use crate::consensus::store::{StoreReader, StoreWriter};
use crate::types::{HistoryRow, NameRecord, NamespaceRecord, Op, PreorderHash, PreorderRecord};

const CF_NAMES: &str = "names";
const CF_NAMESPACES: &str = "namespaces";
const CF_PREORDERS: &str = "preorders";
const CF_HISTORY: &str = "history";
const CF_BLOCK_OPS: &str = "block_ops";

/// Configuration for opening a [`RocksDbNameStore`].
#[derive(Clone, Debug)]
pub struct RocksDbConfig {
    pub path: String,
    pub create_if_missing: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./nameset-db".to_string(),
            create_if_missing: true,
        }
    }
}

#[derive(Debug)]
pub enum StorageError {
    RocksDb(rocksdb::Error),
    MissingColumnFamily(&'static str),
    Codec(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::RocksDb(e) => write!(f, "rocksdb error: {e}"),
            StorageError::MissingColumnFamily(cf) => write!(f, "missing column family '{cf}'"),
            StorageError::Codec(msg) => write!(f, "codec error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

pub struct RocksDbNameStore {
    db: DB,
}

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    encode_to_vec(value, bincode_config()).expect("record always encodes")
}

fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> T {
    decode_from_slice(bytes, bincode_config())
        .expect("stored record always decodes to its own type")
        .0
}

impl RocksDbNameStore {
    pub fn open(config: &RocksDbConfig) -> Result<Self, StorageError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(config.create_if_missing);

        let cfs = [CF_NAMES, CF_NAMESPACES, CF_PREORDERS, CF_HISTORY, CF_BLOCK_OPS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&db_opts, &config.path, cfs).map_err(StorageError::RocksDb)?;
        Ok(RocksDbNameStore { db })
    }

    fn cf(&self, name: &'static str) -> Result<&rocksdb::ColumnFamily, StorageError> {
        self.db.cf_handle(name).ok_or(StorageError::MissingColumnFamily(name))
    }
}

impl StoreReader for RocksDbNameStore {
    fn get_name_raw(&self, name: &str) -> Option<NameRecord> {
        let cf = self.cf(CF_NAMES).ok()?;
        self.db.get_cf(cf, name.as_bytes()).ok()?.map(|bytes| decode(&bytes))
    }

    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        let cf = self.cf(CF_NAMESPACES).ok()?;
        self.db.get_cf(cf, namespace_id.as_bytes()).ok()?.map(|bytes| decode(&bytes))
    }

    fn get_preorder(&self, preorder_hash: &PreorderHash) -> Option<PreorderRecord> {
        let cf = self.cf(CF_PREORDERS).ok()?;
        self.db.get_cf(cf, preorder_hash.0.as_bytes()).ok()?.map(|bytes| decode(&bytes))
    }

    fn history_of(&self, history_id: &str) -> Vec<HistoryRow> {
        let Ok(cf) = self.cf(CF_HISTORY) else {
            return Vec::new();
        };
        match self.db.get_cf(cf, history_id.as_bytes()) {
            Ok(Some(bytes)) => decode(&bytes),
            _ => Vec::new(),
        }
    }

    fn all_names(&self) -> Vec<NameRecord> {
        let Ok(cf) = self.cf(CF_NAMES) else {
            return Vec::new();
        };
        self.db
            .iterator_cf(cf, rocksdb::IteratorMode::Start)
            .filter_map(|item| item.ok())
            .map(|(_, value)| decode(&value))
            .collect()
    }

    fn all_history_ids(&self) -> Vec<String> {
        let Ok(cf) = self.cf(CF_HISTORY) else {
            return Vec::new();
        };
        self.db
            .iterator_cf(cf, rocksdb::IteratorMode::Start)
            .filter_map(|item| item.ok())
            .map(|(key, _)| String::from_utf8_lossy(&key).into_owned())
            .collect()
    }

    fn get_all_ops_at_raw(&self, height: u64) -> Vec<Op> {
        let Ok(cf) = self.cf(CF_BLOCK_OPS) else {
            return Vec::new();
        };
        match self.db.get_cf(cf, height.to_be_bytes()) {
            Ok(Some(bytes)) => decode(&bytes),
            _ => Vec::new(),
        }
    }
}

impl StoreWriter for RocksDbNameStore {
    fn put_preorder(&mut self, record: PreorderRecord) {
        let cf = self.cf(CF_PREORDERS).expect("preorders column family must exist");
        let key = record.preorder_hash.0.as_bytes().to_vec();
        self.db.put_cf(cf, key, encode(&record)).expect("rocksdb put must succeed");
    }

    fn consume_preorder(&mut self, preorder_hash: &PreorderHash) {
        if let Some(mut record) = self.get_preorder(preorder_hash) {
            record.consumed = true;
            self.put_preorder(record);
        }
    }

    fn put_name(&mut self, record: NameRecord) {
        let cf = self.cf(CF_NAMES).expect("names column family must exist");
        let key = record.name.clone();
        self.db.put_cf(cf, key, encode(&record)).expect("rocksdb put must succeed");
    }

    fn put_namespace(&mut self, record: NamespaceRecord) {
        let cf = self.cf(CF_NAMESPACES).expect("namespaces column family must exist");
        let key = record.namespace_id.clone();
        self.db.put_cf(cf, key, encode(&record)).expect("rocksdb put must succeed");
    }

    fn append_history(&mut self, history_id: &str, row: HistoryRow) {
        let mut rows = self.history_of(history_id);
        rows.push(row);
        let cf = self.cf(CF_HISTORY).expect("history column family must exist");
        self.db
            .put_cf(cf, history_id.as_bytes(), encode(&rows))
            .expect("rocksdb put must succeed");
    }

    fn put_block_ops(&mut self, block_number: u64, ops: &[Op]) {
        let cf = self.cf(CF_BLOCK_OPS).expect("block_ops column family must exist");
        self.db
            .put_cf(cf, block_number.to_be_bytes(), encode(&ops.to_vec()))
            .expect("rocksdb put must succeed");
    }
}
