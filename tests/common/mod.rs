//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use hash_balancer::{BalancerConfig, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Start a backend that answers `/health` according to `healthy` and every
/// other path with 200 and its own name as the body.
pub async fn start_backend(name: &'static str, healthy: Arc<AtomicBool>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/health",
            get(move || {
                let healthy = healthy.clone();
                async move {
                    if healthy.load(Ordering::SeqCst) {
                        StatusCode::OK
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }
            }),
        )
        .fallback(move || async move { ([("x-served-by", name)], name) });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Backend that is always healthy.
pub async fn start_healthy_backend(name: &'static str) -> SocketAddr {
    start_backend(name, Arc::new(AtomicBool::new(true))).await
}

/// Start a raw TCP backend that passes health checks but hangs up on every
/// other request without answering.
pub async fn start_hangup_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let mut read = 0;
                        while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf[read..]).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => read += n,
                            }
                            if read == buf.len() {
                                return;
                            }
                        }
                        if buf[..read].starts_with(b"GET /health ") {
                            let _ = socket
                                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                                .await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config over `backends` with a short health interval.
pub fn config_for(backends: &[SocketAddr]) -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.pool.servers = backends.iter().map(ToString::to_string).collect();
    config.health_check.interval_secs = 1;
    config.timeouts.request_secs = 2;
    config
}

pub struct RunningBalancer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

impl RunningBalancer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server and its monitors to stop.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("balancer did not stop")
            .unwrap();
    }
}

pub async fn start_balancer(config: BalancerConfig) -> RunningBalancer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    RunningBalancer { addr, shutdown, handle }
}

/// A client that opens a new connection (and so a new source port) per request.
pub fn fresh_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `url` until it answers `status`.
pub async fn wait_for_status(client: &reqwest::Client, url: &str, status: u16) {
    for _ in 0..100 {
        if let Ok(res) = client.get(url).send().await {
            if res.status().as_u16() == status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("{} never answered {}", url, status);
}
