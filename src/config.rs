//! Top-level configuration for a naming-layer node.
//!
//! This module aggregates configuration for:
//!
//! - protocol epoch parameters (`EpochConfig`),
//! - durable storage (RocksDB path and creation flags),
//! - the announcer allow-list for `ANNOUNCE` ops,
//! - engine resource limits (`EngineLimits`),
//! - metrics exporter (enable flag + listen address).
//!
//! The goal is a single `EngineConfig` struct that higher-level binaries
//! (e.g. `main.rs`) can construct from defaults, config files, or
//! environment variables as needed.

use std::net::SocketAddr;

use crate::consensus::config::EngineLimits;
use crate::epoch::EpochConfig;
use crate::storage::RocksDbConfig;
use crate::types::Address;

/// Configuration for the Prometheus metrics exporter.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Whether to run a `/metrics` HTTP exporter.
    pub enabled: bool,
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        let addr: SocketAddr = "127.0.0.1:9898"
            .parse()
            .expect("hard-coded metrics listen address should parse");
        Self { enabled: true, listen_addr: addr }
    }
}

/// Top-level configuration for a naming-layer node.
///
/// This aggregates all the sub-configs needed to wire up a typical node:
///
/// - protocol parameters (`epoch`),
/// - persistent storage (`storage`),
/// - the block height the engine treats as genesis (`genesis_block`),
/// - addresses authorized to send `ANNOUNCE` (`announcers`),
/// - engine resource limits (`limits`),
/// - Prometheus metrics exporter (`metrics`).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub epoch: EpochConfig,
    pub storage: RocksDbConfig,
    pub genesis_block: u64,
    pub announcers: Vec<Address>,
    pub limits: EngineLimits,
    pub metrics: MetricsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epoch: EpochConfig::default(),
            storage: RocksDbConfig::default(),
            genesis_block: 0,
            announcers: Vec::new(),
            limits: EngineLimits::default(),
            metrics: MetricsConfig::default(),
        }
    }
}
