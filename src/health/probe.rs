//! Single liveness check against one backend.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::BalancerConfig;
use crate::load_balancer::backend::{BackendAddress, Scheme};

/// Issues `GET {scheme}://{backend}{path}` and reports whether it answered 200.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: Client,
    scheme: Scheme,
    path: String,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(client: Client, scheme: Scheme, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            scheme,
            path: path.into(),
            timeout,
        }
    }

    pub fn from_config(client: Client, config: &BalancerConfig) -> Self {
        Self::new(
            client,
            config.pool.scheme(),
            config.health_check.path.clone(),
            config.timeouts.request(),
        )
    }

    /// True iff a response arrives within the timeout with status exactly 200.
    ///
    /// The response (and its connection) is dropped before returning, whatever
    /// the outcome.
    pub async fn probe(&self, backend: &BackendAddress) -> bool {
        let url = match backend.url(self.scheme, &self.path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(backend = %backend, error = %e, "Failed to build health check URL");
                return false;
            }
        };

        let result = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, "hash-balancer-health-check")
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::warn!(backend = %backend, status = %response.status(), "Health check failed: non-200 status");
                false
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(backend = %backend, "Health check failed: timeout");
                false
            }
            Err(e) => {
                tracing::warn!(backend = %backend, error = %e, "Health check failed: connection error");
                false
            }
        }
    }
}
