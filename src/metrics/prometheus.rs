//! Prometheus-backed metrics and HTTP exporter.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and a set of strongly-typed engine metrics, and an
//! async HTTP exporter that serves `/metrics` using `hyper`.

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode, body::Incoming, header, server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

/// Engine-related Prometheus metrics.
///
/// These are registered into a [`Registry`] and updated from
/// [`crate::consensus::engine::Engine::process_block`].
#[derive(Clone)]
pub struct EngineMetrics {
    /// Latency of a full `process_block` call, in seconds.
    pub block_processing_seconds: Histogram,
    /// Total ops committed to state across all processed blocks.
    pub ops_accepted_total: IntCounter,
    /// Total ops rejected during validation.
    pub ops_rejected_total: IntCounter,
    /// Total ops dropped to an in-block collision.
    pub ops_collided_total: IntCounter,
    /// Total blocks that aborted processing via a [`crate::consensus::FatalError`].
    pub fatal_errors_total: IntCounter,
}

impl EngineMetrics {
    /// Registers engine metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let block_processing_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "engine_block_processing_seconds",
                "Time to run the full per-block pipeline in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
        )?;
        registry.register(Box::new(block_processing_seconds.clone()))?;

        let ops_accepted_total = IntCounter::with_opts(Opts::new(
            "engine_ops_accepted_total",
            "Total ops committed to state",
        ))?;
        registry.register(Box::new(ops_accepted_total.clone()))?;

        let ops_rejected_total = IntCounter::with_opts(Opts::new(
            "engine_ops_rejected_total",
            "Total ops rejected during validation",
        ))?;
        registry.register(Box::new(ops_rejected_total.clone()))?;

        let ops_collided_total = IntCounter::with_opts(Opts::new(
            "engine_ops_collided_total",
            "Total ops dropped to an in-block collision",
        ))?;
        registry.register(Box::new(ops_collided_total.clone()))?;

        let fatal_errors_total = IntCounter::with_opts(Opts::new(
            "engine_fatal_errors_total",
            "Total blocks that aborted processing via a fatal consensus error",
        ))?;
        registry.register(Box::new(fatal_errors_total.clone()))?;

        Ok(Self {
            block_processing_seconds,
            ops_accepted_total,
            ops_rejected_total,
            ops_collided_total,
            fatal_errors_total,
        })
    }
}

/// Wrapper around a Prometheus registry and the engine metrics.
///
/// This is the main handle you pass around in the node. It can be wrapped
/// in an [`Arc`] and shared across threads/tasks.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub engine: EngineMetrics,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// and registers the engine metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("nameset".to_string()), None)?;
        let engine = EngineMetrics::register(&registry)?;
        Ok(Self { registry, engine })
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            eprintln!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// The server listens on `addr` and serves `GET /metrics` with the
/// Prometheus text exposition format. All other paths return 404.
///
/// This function is `async` and is intended to be spawned onto a Tokio
/// runtime, e.g.:
///
/// ```ignore
/// let registry = Arc::new(MetricsRegistry::new()?);
/// let addr: SocketAddr = "127.0.0.1:9898".parse()?;
/// tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
/// ```
pub async fn run_prometheus_http_server(
    metrics: Arc<MetricsRegistry>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                eprintln!("prometheus HTTP server error: {err}");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => {
            let body = metrics.gather_text();
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                .body(Full::new(Bytes::from(body)))
                .unwrap())
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap()),
    }
}
