//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that catches every path and method
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Start one health monitor task per backend
//! - Route each request by client address and forward it

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::BalancerConfig;
use crate::health::{HealthMonitor, HealthProbe, HealthRegistry};
use crate::http::forward::{backend_client, ForwardingProxy};
use crate::http::request::{request_id, MakeRequestUuid};
use crate::lifecycle::Shutdown;
use crate::load_balancer::{pool::ServerPool, router::Router as BackendRouter};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<BackendRouter>,
    pub proxy: ForwardingProxy,
}

/// HTTP front end of the load balancer.
pub struct HttpServer {
    app: Router,
    config: BalancerConfig,
    registry: Arc<HealthRegistry>,
    client: reqwest::Client,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BalancerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(config, backend_client()?))
    }

    /// Create a server that reaches backends through `client`.
    pub fn with_client(config: BalancerConfig, client: reqwest::Client) -> Self {
        let pool = ServerPool::new(config.pool.servers.iter().map(String::as_str));
        let registry = Arc::new(HealthRegistry::new(pool));

        let state = AppState {
            router: Arc::new(BackendRouter::new(registry.clone(), config.pool.strategy)),
            proxy: ForwardingProxy::from_config(client.clone(), &config),
        };

        let app = Self::build_router(&config, state);
        Self {
            app,
            config,
            registry,
            client,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BalancerConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            // The limit layer must wrap the timeout: the timeout builds its
            // own 408 body and needs `Default` on the inner response body.
            .layer(RequestBodyLimitLayer::new(config.forwarding.max_body_bytes))
            .layer(TimeoutLayer::new(config.timeouts.client()));

        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` is triggered. Health monitoring runs for the same span.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.registry.pool().len(),
            "HTTP server starting"
        );

        let probe = HealthProbe::from_config(self.client.clone(), &self.config);
        let monitors = HealthMonitor::new(self.registry.clone(), probe, self.config.health_check.interval())
            .spawn(&shutdown);

        let mut server_shutdown = shutdown.subscribe();
        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                server_shutdown.recv().await;
            })
            .await;

        if !shutdown.is_triggered() {
            tracing::warn!("HTTP server stopped before shutdown was requested");
        }
        shutdown.trigger();
        futures_util::future::join_all(monitors).await;

        for (backend, state) in self.registry.statuses() {
            tracing::info!(backend = %backend, state = ?state, "Final backend health");
        }
        tracing::info!("HTTP server stopped");
        result
    }
}

/// Main proxy handler.
/// Routes by client address and forwards the request once.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let client = peer.to_string();

    let decision = match state.router.route(&client) {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!(client = %client, error = %e, "No backend for request");
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), "none", start_time);
            return response;
        }
    };

    tracing::debug!(
        client = %decision.client,
        hash = decision.hash,
        backend = %decision.backend,
        "Routed request"
    );

    let response = match state.proxy.forward(&decision.backend, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(backend = %decision.backend, error = %e, "Failed to get response from backend");
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), decision.backend.as_str(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server_over(servers: &[&str]) -> HttpServer {
        let mut config = BalancerConfig::default();
        config.pool.servers = servers.iter().map(|s| s.to_string()).collect();
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn nothing_healthy_is_service_unavailable() {
        let server = server_over(&["127.0.0.1:1", "127.0.0.1:2"]);
        let app = server.app.clone().layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4242))));

        let response = app
            .oneshot(Request::builder().uri("/anything").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn client_request_id_is_kept() {
        let server = server_over(&["127.0.0.1:1"]);
        let app = server.app.clone().layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4242))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-7");
    }

    #[test]
    fn registry_mirrors_configured_pool() {
        let server = server_over(&["b:2", "a:1"]);
        let names: Vec<&str> = server.registry.pool().iter().map(|b| b.as_str()).collect();
        assert_eq!(names, ["b:2", "a:1"]);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_before_routing() {
        let mut config = BalancerConfig::default();
        config.pool.servers = vec!["127.0.0.1:1".to_string()];
        config.forwarding.max_body_bytes = 16;
        let server = HttpServer::new(config).unwrap();
        let app = server.app.clone().layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4242))));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header("content-length", "64")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_and_reports_health() {
        let server = server_over(&["127.0.0.1:1"]);
        let registry = server.registry.clone();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Shutdown::new();

        let handle = tokio::spawn(server.run(listener, shutdown.clone()));
        shutdown.trigger();

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(registry.statuses().len(), 1);
    }
}
