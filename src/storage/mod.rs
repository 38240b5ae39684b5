//! Storage backends for the naming-layer state engine.
//!
//! Provides concrete implementations of
//! [`crate::consensus::store::StoreReader`]/[`crate::consensus::store::StoreWriter`]:
//!
//! - an in-memory store ([`memory::InMemoryNameStore`]) for tests and
//!   one-shot replays,
//! - a RocksDB-backed store ([`rocksdb_store::RocksDbNameStore`]) for a
//!   long-running node.

pub mod memory;
pub mod rocksdb_store;

pub use memory::InMemoryNameStore;
pub use rocksdb_store::{RocksDbConfig, RocksDbNameStore, StorageError};
