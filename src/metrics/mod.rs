//! Metrics and instrumentation for the naming-layer engine.
//!
//! This module defines Prometheus-compatible metrics for
//! [`crate::consensus::engine::Engine`] and exposes a small HTTP exporter
//! that serves `/metrics` in Prometheus text format.
//!
//! Typical usage in a node:
//!
//! ```ignore
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use nameset_engine::metrics::{MetricsRegistry, run_prometheus_http_server};
//!
//! let registry = Arc::new(MetricsRegistry::new()?);
//! let addr: SocketAddr = "127.0.0.1:9898".parse()?;
//!
//! // Spawn the HTTP exporter in the background:
//! tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
//!
//! // Elsewhere in the code, after processing a block:
//! registry.engine.block_processing_seconds.observe(duration_secs);
//! ```

pub mod prometheus;

pub use prometheus::{EngineMetrics, MetricsRegistry, run_prometheus_http_server};
