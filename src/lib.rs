//! Address-hashing HTTP load balancer.
//!
//! Every client is pinned to one backend by hashing its address over the
//! set of backends that currently pass their health check.

pub mod cli;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
