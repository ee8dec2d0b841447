//! Per-request backend selection.
//!
//! # Responsibilities
//! - Take one healthy-set snapshot per request
//! - Apply the configured hashing strategy to the client address
//! - Report an explicit error when nothing is healthy

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::HashStrategy;
use crate::health::state::HealthRegistry;
use crate::load_balancer::{
    backend::BackendAddress, modulo::ModuloHash, rendezvous::RendezvousHash, LoadBalancer,
};

/// Outcome of routing one request. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub client: String,
    /// What the strategy selected on (see [`Selection`](crate::load_balancer::Selection)).
    pub hash: u32,
    pub backend: BackendAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no healthy backends available")]
    NoBackendsAvailable,
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            RouteError::NoBackendsAvailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "No healthy backends").into_response()
            }
        }
    }
}

/// Maps client addresses onto the currently healthy backends.
#[derive(Debug)]
pub struct Router {
    registry: Arc<HealthRegistry>,
    balancer: Box<dyn LoadBalancer>,
}

impl Router {
    pub fn new(registry: Arc<HealthRegistry>, strategy: HashStrategy) -> Self {
        let balancer: Box<dyn LoadBalancer> = match strategy {
            HashStrategy::Modulo => Box::new(ModuloHash::new()),
            HashStrategy::Rendezvous => Box::new(RendezvousHash::new()),
        };
        Self { registry, balancer }
    }

    /// Select a backend for `client` from a fresh healthy-set snapshot.
    pub fn route(&self, client: &str) -> Result<RoutingDecision, RouteError> {
        let healthy = self.registry.healthy_set();
        let (selection, backend) = self
            .balancer
            .select(client, &healthy)
            .and_then(|selection| Some((selection, healthy.get(selection.index)?)))
            .ok_or(RouteError::NoBackendsAvailable)?;

        Ok(RoutingDecision {
            client: client.to_string(),
            hash: selection.hash,
            backend: backend.clone(),
        })
    }
}
