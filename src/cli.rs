//! Command line flags.
//!
//! Flags override the config file; the merged result is validated once.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{load_config, BalancerConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "hash-balancer")]
#[command(about = "Address-hashing HTTP load balancer with active health checks", long_about = None)]
pub struct Cli {
    /// TOML configuration file. Built-in defaults are used when absent.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Load balancer port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Request and health check timeout in seconds.
    #[arg(long = "timeout-sec")]
    pub timeout_sec: Option<u64>,

    /// Backends speak https. `--https=false` overrides the config file.
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub https: Option<bool>,

    /// Include the serving backend in every response (lb-from header).
    /// `--trace=false` overrides the config file.
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub trace: Option<bool>,

    /// Backend address; repeat to build the pool in order. Replaces the configured pool.
    #[arg(long = "backend", value_name = "HOST:PORT")]
    pub backends: Vec<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut BalancerConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(secs) = self.timeout_sec {
            config.timeouts.request_secs = secs;
            config.timeouts.client_secs = config.timeouts.client_secs.max(secs);
        }
        if let Some(https) = self.https {
            config.pool.https = https;
        }
        if let Some(trace) = self.trace {
            config.forwarding.trace_enabled = trace;
        }
        if !self.backends.is_empty() {
            config.pool.servers = self.backends.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }

    /// Read the config file (if any), apply flags, validate.
    pub fn load(&self) -> Result<BalancerConfig, ConfigError> {
        load_config(self.config.as_deref(), |config| self.apply(config))
    }
}
