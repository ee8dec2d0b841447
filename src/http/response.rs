//! Response handling and transformation.
//!
//! # Responsibilities
//! - Copy backend response headers onto the client response
//! - Stamp the serving backend when tracing is enabled
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - Hop-by-hop headers are left to the client-facing connection

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::http::request::is_hop_by_hop;
use crate::load_balancer::backend::BackendAddress;

/// Names the backend that produced a response.
pub const LB_FROM: HeaderName = HeaderName::from_static("lb-from");

/// Append every end-to-end header of `from` to `to`, keeping repeated values.
pub fn copy_response_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if !is_hop_by_hop(name) {
            to.append(name.clone(), value.clone());
        }
    }
}

/// Set `lb-from: <backend>`, replacing any value the backend sent.
pub fn stamp_backend(headers: &mut HeaderMap, backend: &BackendAddress) {
    match HeaderValue::from_str(backend.as_str()) {
        Ok(value) => {
            headers.insert(LB_FROM, value);
        }
        Err(e) => {
            tracing::warn!(backend = %backend, error = %e, "Backend address is not a valid header value");
        }
    }
}
