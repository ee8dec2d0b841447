//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend addresses and reject duplicates
//! - Validate value ranges (timeouts > 0, interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::BalancerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("backend pool is empty")]
    EmptyPool,
    #[error("backend address {0:?} is not host:port")]
    InvalidBackend(String),
    #[error("backend address {0:?} is listed more than once")]
    DuplicateBackend(String),
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("timeouts.client_secs ({client}) is shorter than timeouts.request_secs ({request})")]
    ClientTimeoutTooShort { client: u64, request: u64 },
    #[error("health_check.interval_secs must be greater than zero")]
    ZeroInterval,
    #[error("health_check.path {0:?} must start with '/'")]
    InvalidHealthPath(String),
    #[error("forwarding.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check every semantic rule and report all violations.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pool.servers.is_empty() {
        errors.push(ValidationError::EmptyPool);
    }

    let mut seen = HashSet::new();
    for server in &config.pool.servers {
        if !is_host_port(server) {
            errors.push(ValidationError::InvalidBackend(server.clone()));
        } else if !seen.insert(server.as_str()) {
            errors.push(ValidationError::DuplicateBackend(server.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.client_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("client_secs"));
    } else if config.timeouts.client_secs < config.timeouts.request_secs {
        errors.push(ValidationError::ClientTimeoutTooShort {
            client: config.timeouts.client_secs,
            request: config.timeouts.request_secs,
        });
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(config.health_check.path.clone()));
    }

    if config.forwarding.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a non-empty host, a u16 port and nothing that would
/// change the meaning of a URL authority.
fn is_host_port(address: &str) -> bool {
    let Some((host, port)) = address.rsplit_once(':') else {
        return false;
    };
    !host.is_empty()
        && port.parse::<u16>().is_ok()
        && !address.contains(['/', '?', '#', '@', ' '])
}
