//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)            command line flags
//!     → loader.rs (parse)           → cli.rs (override)
//!                  ↘               ↙
//!                 validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//!     → handed by value to each subsystem constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend pool never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - No process-wide flag state: every component receives its settings explicitly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::BalancerConfig;
pub use schema::{
    ForwardingConfig, HashStrategy, HealthCheckConfig, ListenerConfig, ObservabilityConfig,
    PoolConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
