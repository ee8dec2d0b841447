//! Request forwarding to a selected backend.
//!
//! # Responsibilities
//! - Rebuild the inbound request against `{scheme}://{backend}`
//! - Relay status, headers and a streamed body back to the client
//! - Map failures to client-facing status codes
//!
//! # Design Decisions
//! - Single attempt: a failed forward is never retried on another backend
//! - A failed forward does not mark the backend unhealthy
//! - Inbound bodies are buffered (bounded); outbound bodies are streamed

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::{redirect, Client};

use crate::config::BalancerConfig;
use crate::http::request::strip_hop_by_hop;
use crate::http::response::{copy_response_headers, stamp_backend};
use crate::load_balancer::backend::{BackendAddress, Scheme};

/// Client shared by health probes and forwarding.
///
/// Redirects are handed back to the client untouched and environment
/// proxies are ignored: backends are always dialled directly.
pub fn backend_client() -> reqwest::Result<Client> {
    Client::builder()
        .redirect(redirect::Policy::none())
        .no_proxy()
        .build()
}

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid forwarding target: {0}")]
    InvalidTarget(#[from] url::ParseError),
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = match self {
            ForwardError::Body(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ForwardError::InvalidTarget(_) | ForwardError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        status.into_response()
    }
}

/// Relays one request to one backend.
#[derive(Debug, Clone)]
pub struct ForwardingProxy {
    client: Client,
    scheme: Scheme,
    timeout: Duration,
    trace_enabled: bool,
    max_body_bytes: usize,
}

impl ForwardingProxy {
    pub fn new(client: Client, scheme: Scheme, timeout: Duration, trace_enabled: bool, max_body_bytes: usize) -> Self {
        Self {
            client,
            scheme,
            timeout,
            trace_enabled,
            max_body_bytes,
        }
    }

    pub fn from_config(client: Client, config: &BalancerConfig) -> Self {
        Self::new(
            client,
            config.pool.scheme(),
            config.timeouts.request(),
            config.forwarding.trace_enabled,
            config.forwarding.max_body_bytes,
        )
    }

    /// Forward `request` to `backend`.
    ///
    /// On success the response carries the backend's status and end-to-end
    /// headers, plus `lb-from` when tracing is enabled, and streams the
    /// backend body. The timeout covers the whole exchange, body included.
    pub async fn forward(&self, backend: &BackendAddress, request: Request<Body>) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let url = backend.url(self.scheme, path_and_query)?;

        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(ForwardError::Body)?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);

        let upstream = self
            .client
            .request(parts.method.clone(), url.clone())
            .headers(headers)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = upstream.status();
        tracing::info!(method = %parts.method, status = status.as_u16(), target = %url, "fwd");

        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        copy_response_headers(upstream.headers(), response.headers_mut());
        if self.trace_enabled {
            stamp_backend(response.headers_mut(), backend);
        }
        *response.body_mut() = Body::from_stream(upstream.bytes_stream());

        Ok(response)
    }
}
