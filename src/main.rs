// src/main.rs
//
// Minimal demo node that wires up the nameset-engine library:
//
// - RocksDB-backed storage
// - The append-only consensus snapshot
// - Prometheus metrics exporter on /metrics
// - A block-consumption loop that replays whatever `BlockSource` the node
//   is configured with through `Engine::process_block`.
//
// A real deployment would plug in a `BlockSource` backed by a Bitcoin RPC
// client or block-relay feed; this binary uses an empty `FixtureBlockSource`
// so the crate runs standalone without any external dependency.

use std::sync::Arc;

use nameset_engine::consensus::snapshot::ConsensusSnapshot;
use nameset_engine::storage::rocksdb_store::RocksDbNameStore;
use nameset_engine::{EngineConfig, Engine, FixtureBlockSource, BlockSource, MetricsRegistry, run_prometheus_http_server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run_node().await {
        tracing::error!(%err, "fatal error");
        std::process::exit(1);
    }
}

async fn run_node() -> Result<(), String> {
    let cfg = EngineConfig::default();

    // ---------------------------
    // Metrics registry + exporter
    // ---------------------------

    let metrics = Arc::new(
        MetricsRegistry::new().map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    if cfg.metrics.enabled {
        let metrics_clone = metrics.clone();
        let addr = cfg.metrics.listen_addr;
        tokio::spawn(async move {
            if let Err(e) = run_prometheus_http_server(metrics_clone, addr).await {
                tracing::error!(%e, "metrics HTTP server error");
            }
        });
        tracing::info!(%addr, "metrics exporter listening");
    }

    // ---------------------------
    // Storage + consensus snapshot
    // ---------------------------

    let store = RocksDbNameStore::open(&cfg.storage)
        .map_err(|e| format!("failed to open RocksDB store at {}: {e:?}", cfg.storage.path))?;

    let snapshot_path = format!("{}/consensus.snapshot", cfg.storage.path);
    let snapshot = ConsensusSnapshot::open(&snapshot_path)
        .map_err(|e| format!("failed to open consensus snapshot at {snapshot_path}: {e:?}"))?;

    let mut engine = Engine::new(
        store,
        snapshot,
        cfg.epoch.clone(),
        cfg.announcers.clone(),
        cfg.limits.clone(),
        cfg.genesis_block,
    );

    // ---------------------------
    // Block source (demo: empty)
    // ---------------------------

    let mut source = FixtureBlockSource::new(Vec::new());

    tracing::info!("starting node, replaying blocks from the configured block source");

    while let Some(block) = source.next_block() {
        let start = std::time::Instant::now();
        let block_number = block.block_number;

        match engine.process_block(&block) {
            Ok(result) => {
                let elapsed = start.elapsed().as_secs_f64();
                metrics.engine.block_processing_seconds.observe(elapsed);
                metrics.engine.ops_accepted_total.inc_by(result.accepted as u64);
                metrics.engine.ops_rejected_total.inc_by(result.rejected as u64);
                metrics.engine.ops_collided_total.inc_by(result.collided as u64);

                tracing::info!(
                    block_number,
                    accepted = result.accepted,
                    rejected = result.rejected,
                    collided = result.collided,
                    consensus_hash = %result.consensus_hash.to_hex(),
                    "processed block",
                );
            }
            Err(e) => {
                metrics.engine.fatal_errors_total.inc();
                return Err(format!("fatal error processing block {block_number}: {e}"));
            }
        }
    }

    tracing::info!("block source exhausted, exiting");
    Ok(())
}
