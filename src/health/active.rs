//! Active health checking.
//!
//! # Responsibilities
//! - Run one independent probe loop per backend
//! - Write every probe result into the registry

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::health::probe::HealthProbe;
use crate::health::state::HealthRegistry;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::load_balancer::backend::BackendAddress;
use crate::observability::metrics;

pub struct HealthMonitor {
    registry: Arc<HealthRegistry>,
    probe: HealthProbe,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(registry: Arc<HealthRegistry>, probe: HealthProbe, interval: Duration) -> Self {
        Self {
            registry,
            probe,
            interval,
        }
    }

    /// Spawn one task per backend. Each probes immediately, then once per
    /// interval, until shutdown is triggered.
    pub fn spawn(self, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        tracing::info!(
            backends = self.registry.pool().len(),
            interval_secs = self.interval.as_secs_f64(),
            "Health monitor starting"
        );

        self.registry
            .pool()
            .iter()
            .map(|backend| {
                let task = watch_backend(
                    backend.clone(),
                    self.registry.clone(),
                    self.probe.clone(),
                    self.interval,
                    shutdown.subscribe(),
                );
                tokio::spawn(task)
            })
            .collect()
    }
}

async fn watch_backend(
    backend: BackendAddress,
    registry: Arc<HealthRegistry>,
    probe: HealthProbe,
    interval: Duration,
    mut shutdown: ShutdownSignal,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.recv() => break,
        }

        let healthy = tokio::select! {
            healthy = probe.probe(&backend) => healthy,
            _ = shutdown.recv() => break,
        };

        let previous = registry.state(&backend);
        if registry.update(&backend, healthy) {
            tracing::info!(backend = %backend, from = ?previous, healthy, "Backend health changed");
        } else {
            tracing::debug!(backend = %backend, healthy, "Health check complete");
        }
        metrics::record_backend_health(backend.as_str(), healthy);
    }

    tracing::debug!(backend = %backend, "Health monitor stopped");
}
