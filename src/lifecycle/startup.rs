//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics when enabled
//! - Bind the listener
//! - Start the HTTP server (which starts health monitoring)
//! - Hand termination signals to the shutdown coordinator
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The configuration arrives already validated

use std::net::{AddrParseError, SocketAddr};

use tokio::net::TcpListener;

use crate::config::BalancerConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals::spawn_signal_handler, Shutdown};
use crate::observability::metrics;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("failed to build backend client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Run the balancer until a termination signal arrives.
pub async fn start(config: BalancerConfig) -> Result<(), StartupError> {
    let bind_address = config.listener.bind_address();

    tracing::info!(
        bind_address = %bind_address,
        backends = ?config.pool.servers,
        scheme = %config.pool.scheme(),
        strategy = ?config.pool.strategy,
        request_timeout_secs = config.timeouts.request_secs,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );
    tracing::info!("Tracing support enabled: {}", config.forwarding.trace_enabled);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    tracing::info!("Starting load balancer...");
    server.run(listener, shutdown).await.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
