//! hash-balancer
//!
//! An HTTP load balancer that pins each client to a backend by hashing its
//! address over the currently healthy backends.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                    LOAD BALANCER                     │
//!                      │                                                      │
//!   Client Request     │  ┌─────────┐    ┌──────────────┐    ┌─────────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│load_balancer │───▶│   forward   │──┼──▶ Backend
//!                      │  │ server  │    │   router     │    │ (1 attempt) │  │
//!                      │  └─────────┘    └──────┬───────┘    └─────────────┘  │
//!                      │                        │ healthy snapshot            │
//!                      │                 ┌──────┴───────┐                     │
//!                      │                 │    health    │◀── probe task ──────┼──▶ GET /health
//!                      │                 │   registry   │◀── probe task ──────┼──▶ (one per backend)
//!                      │                 └──────────────┘                     │
//!                      │                                                      │
//!                      │  config · cli · observability · lifecycle            │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use hash_balancer::cli::Cli;
use hash_balancer::lifecycle::startup;
use hash_balancer::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init(&config.observability.log_level);
    tracing::info!("hash-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    startup::start(config).await?;
    Ok(())
}
