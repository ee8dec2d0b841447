//! The fixed, ordered backend pool.

use std::ops::Deref;
use std::sync::Arc;

use crate::load_balancer::backend::BackendAddress;

/// Ordered list of every configured backend.
///
/// Built once at startup and never mutated; healthy subsets are always
/// filtered from it in this order.
#[derive(Debug, Clone)]
pub struct ServerPool {
    servers: Arc<[BackendAddress]>,
}

impl ServerPool {
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BackendAddress>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of a backend in configuration order.
    pub fn position(&self, backend: &BackendAddress) -> Option<usize> {
        self.servers.iter().position(|b| b == backend)
    }
}

impl Deref for ServerPool {
    type Target = [BackendAddress];
    fn deref(&self) -> &Self::Target {
        &self.servers
    }
}
