//! Naming-layer state engine crate.
//!
//! This crate provides the core building blocks for a deterministic,
//! replayable naming-layer state machine built atop a proof-of-work
//! blockchain:
//!
//! - strongly-typed domain types (`types`),
//! - epoch-scoped protocol parameters (`epoch`),
//! - the narrow block/transaction interface the engine consumes (`block_source`),
//! - the wire op parser/extractor (`parser`),
//! - per-opcode validation (`validation`),
//! - the consensus engine that drives the per-block pipeline (`consensus`),
//! - storage backends (`storage`),
//! - Prometheus-based metrics (`metrics`),
//! - and a top-level node configuration (`config`).
//!
//! Higher-level binaries compose these pieces to replay a chain of blocks
//! into committed naming-layer state.

pub mod block_source;
pub mod config;
pub mod consensus;
pub mod epoch;
pub mod metrics;
pub mod parser;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export top-level configuration types.
pub use config::{EngineConfig, MetricsConfig};

// Re-export the consensus engine and its error/result types.
pub use consensus::{BlockResult, Engine, FatalError, RejectReason};

// Re-export the block/transaction interface.
pub use block_source::{BlockSource, FixtureBlockSource, RawBlock, RawTx};

// Re-export storage backends.
pub use storage::{InMemoryNameStore, RocksDbConfig, RocksDbNameStore, StorageError};

// Re-export epoch configuration.
pub use epoch::{EpochConfig, EpochRules};

// Re-export the validator used to drive the engine.
pub use validation::NamingValidator;

// Re-export metrics registry and engine metrics.
pub use metrics::{EngineMetrics, MetricsRegistry, run_prometheus_http_server};

// Re-export domain types at the crate root for convenience.
pub use types::*;
