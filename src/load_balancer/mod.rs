//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Client address (ip:port)
//!     → router.rs (one healthy-set snapshot per request)
//!     → Apply hashing strategy:
//!         - modulo.rs (hash mod N, the default)
//!         - rendezvous.rs (highest score wins, opt-in)
//!     → hash.rs (FNV-1 32-bit over the address bytes)
//!     → Return the chosen backend or NoBackendsAvailable
//! ```
//!
//! # Design Decisions
//! - Selection is a pure function of (client, healthy snapshot)
//! - The pool (pool.rs) is fixed at startup and never reordered
//! - Unhealthy backends are never in the snapshot, so strategies need no health logic

pub mod backend;
pub mod hash;
pub mod modulo;
pub mod pool;
pub mod rendezvous;
pub mod router;

/// A backend chosen by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Always `< backends.len()`.
    pub index: usize,
    /// The value the choice was made on: the client hash for modulo,
    /// the winning score for rendezvous.
    pub hash: u32,
}

/// A hashing strategy over an ordered list of healthy backends.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick a backend for `client`, or `None` when `backends` is empty.
    fn select(&self, client: &str, backends: &[BackendAddress]) -> Option<Selection>;
}

pub use backend::{BackendAddress, Scheme};
pub use pool::ServerPool;
pub use router::{RouteError, Router, RoutingDecision};
