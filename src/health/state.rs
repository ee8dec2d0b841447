//! Backend health registry.
//!
//! # States
//! - Unknown: not probed yet, excluded from routing
//! - Healthy: backend receives traffic
//! - Unhealthy: backend excluded from routing
//!
//! # Design Decisions
//! - One mutex guards the per-backend states; it is the only write path
//! - Every committed change republishes an immutable healthy snapshot
//! - Readers load the snapshot lock-free and never wait on a writer
//! - Snapshots are filtered from the pool in configuration order

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::load_balancer::{backend::BackendAddress, pool::ServerPool};

/// Health of a single backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown,
    Healthy,
    Unhealthy,
}

impl From<bool> for HealthState {
    fn from(healthy: bool) -> Self {
        if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        }
    }
}

/// Ordered, immutable list of the backends that were healthy when it was taken.
pub type HealthySet = Arc<Vec<BackendAddress>>;

/// Concurrency-safe store of per-backend health.
#[derive(Debug)]
pub struct HealthRegistry {
    pool: ServerPool,
    /// Indexed like `pool`.
    states: Mutex<Vec<HealthState>>,
    healthy: ArcSwap<Vec<BackendAddress>>,
}

impl HealthRegistry {
    /// Every backend starts `Unknown`.
    pub fn new(pool: ServerPool) -> Self {
        let states = vec![HealthState::Unknown; pool.len()];
        Self {
            pool,
            states: Mutex::new(states),
            healthy: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    /// Record the latest probe result for `backend`.
    ///
    /// Returns true when the stored state changed. Addresses outside the
    /// pool are ignored.
    pub fn update(&self, backend: &BackendAddress, healthy: bool) -> bool {
        let Some(index) = self.pool.position(backend) else {
            tracing::warn!(backend = %backend, "Ignoring health update for unknown backend");
            return false;
        };
        let next = HealthState::from(healthy);

        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        if states[index] == next {
            return false;
        }
        states[index] = next;

        let snapshot: Vec<BackendAddress> = self
            .pool
            .iter()
            .zip(states.iter())
            .filter(|(_, state)| **state == HealthState::Healthy)
            .map(|(backend, _)| backend.clone())
            .collect();
        self.healthy.store(Arc::new(snapshot));
        true
    }

    /// The current healthy subset, in pool order.
    pub fn healthy_set(&self) -> HealthySet {
        self.healthy.load_full()
    }

    pub fn state(&self, backend: &BackendAddress) -> Option<HealthState> {
        let index = self.pool.position(backend)?;
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        Some(states[index])
    }

    /// Every backend with its current state, in pool order.
    pub fn statuses(&self) -> Vec<(BackendAddress, HealthState)> {
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        self.pool.iter().cloned().zip(states.iter().copied()).collect()
    }

    /// True once every backend has been probed at least once.
    pub fn is_ready(&self) -> bool {
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        states.iter().all(|state| *state != HealthState::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(servers: &[&str]) -> HealthRegistry {
        HealthRegistry::new(ServerPool::new(servers.iter().copied()))
    }

    fn names(set: &HealthySet) -> Vec<&str> {
        set.iter().map(BackendAddress::as_str).collect()
    }

    #[test]
    fn starts_unknown_and_empty() {
        let reg = registry(&["a:1", "b:2"]);
        assert!(reg.healthy_set().is_empty());
        assert!(!reg.is_ready());
        assert_eq!(reg.state(&"a:1".into()), Some(HealthState::Unknown));
    }

    #[test]
    fn update_is_visible_immediately() {
        let reg = registry(&["a:1", "b:2"]);
        assert!(reg.update(&"b:2".into(), true));
        assert_eq!(names(&reg.healthy_set()), ["b:2"]);

        assert!(reg.update(&"b:2".into(), false));
        assert!(reg.healthy_set().is_empty());
        assert_eq!(reg.state(&"b:2".into()), Some(HealthState::Unhealthy));
    }

    #[test]
    fn update_is_idempotent() {
        let reg = registry(&["a:1"]);
        assert!(reg.update(&"a:1".into(), true));
        assert!(!reg.update(&"a:1".into(), true));
        assert_eq!(names(&reg.healthy_set()), ["a:1"]);
    }

    #[test]
    fn snapshot_keeps_pool_order() {
        let reg = registry(&["c:3", "a:1", "b:2"]);
        reg.update(&"b:2".into(), true);
        reg.update(&"a:1".into(), true);
        reg.update(&"c:3".into(), true);
        assert_eq!(names(&reg.healthy_set()), ["c:3", "a:1", "b:2"]);

        reg.update(&"a:1".into(), false);
        assert_eq!(names(&reg.healthy_set()), ["c:3", "b:2"]);
    }

    #[test]
    fn ready_after_every_backend_reported() {
        let reg = registry(&["a:1", "b:2"]);
        reg.update(&"a:1".into(), true);
        assert!(!reg.is_ready());
        reg.update(&"b:2".into(), false);
        assert!(reg.is_ready());
        assert_eq!(
            reg.statuses(),
            vec![
                (BackendAddress::new("a:1"), HealthState::Healthy),
                (BackendAddress::new("b:2"), HealthState::Unhealthy),
            ]
        );
    }

    #[test]
    fn unknown_backend_is_ignored() {
        let reg = registry(&["a:1"]);
        assert!(!reg.update(&"z:9".into(), true));
        assert!(reg.healthy_set().is_empty());
        assert_eq!(reg.state(&"z:9".into()), None);
    }

    #[test]
    fn old_snapshot_is_unaffected_by_later_updates() {
        let reg = registry(&["a:1", "b:2"]);
        reg.update(&"a:1".into(), true);
        reg.update(&"b:2".into(), true);
        let held = reg.healthy_set();
        reg.update(&"a:1".into(), false);
        assert_eq!(names(&held), ["a:1", "b:2"]);
        assert_eq!(names(&reg.healthy_set()), ["b:2"]);
    }

    #[test]
    fn concurrent_writers_and_readers() {
        let servers: Vec<String> = (0..8).map(|i| format!("10.0.0.{}:80", i)).collect();
        let reg = Arc::new(HealthRegistry::new(ServerPool::new(servers.iter().map(String::as_str))));

        std::thread::scope(|scope| {
            for server in &servers {
                let reg = reg.clone();
                scope.spawn(move || {
                    let backend = BackendAddress::new(server);
                    for round in 0..500 {
                        reg.update(&backend, round % 3 != 0);
                    }
                });
            }
            for _ in 0..4 {
                let reg = reg.clone();
                scope.spawn(move || {
                    for _ in 0..500 {
                        let set = reg.healthy_set();
                        // Always an in-order subset of the pool.
                        let positions: Vec<usize> =
                            set.iter().map(|b| reg.pool().position(b).unwrap()).collect();
                        assert!(positions.windows(2).all(|w| w[0] < w[1]));
                    }
                });
            }
        });

        // Last write per backend was round 499, which is healthy.
        assert_eq!(reg.healthy_set().len(), servers.len());
        assert!(reg.is_ready());
    }
}
