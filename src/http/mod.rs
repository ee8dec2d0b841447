//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (client ip:port)
//!     → server.rs (Axum setup, middleware, proxy handler)
//!     → request.rs (request ID, hop-by-hop stripping)
//!     → [load_balancer::router picks a healthy backend]
//!     → forward.rs (single bounded attempt against the backend)
//!     → response.rs (copy headers, optional lb-from stamp)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, ForwardingProxy};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::LB_FROM;
pub use server::HttpServer;
