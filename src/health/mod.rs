//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     One timer per backend
//!     → probe.rs (GET /health, bounded by the request timeout)
//!     → state.rs (commit result, republish healthy snapshot)
//!
//! Routing (load_balancer::router):
//!     → state.rs healthy_set() (lock-free snapshot read)
//! ```
//!
//! # Design Decisions
//! - Each backend is probed by its own task; a hanging backend delays nobody else
//! - Probe failures only ever become registry state, never errors
//! - Forwarding failures do not touch health; only the monitor writes state
//! - Health state is per-backend, not per-pool

pub mod active;
pub mod probe;
pub mod state;

pub use active::HealthMonitor;
pub use probe::HealthProbe;
pub use state::{HealthRegistry, HealthState, HealthySet};
