//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server by its configured `host:port`
//! - Build probe and forwarding URLs for the configured scheme

use std::fmt;
use std::sync::Arc;
use url::Url;

/// Transport scheme used to reach every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configured address of a single backend.
///
/// Immutable and cheap to clone; the same value is shared by the pool,
/// the health registry and every routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendAddress(Arc<str>);

impl BackendAddress {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(Arc::from(address.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{scheme}://{address}{path_and_query}`.
    pub fn url(&self, scheme: Scheme, path_and_query: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}://{}{}", scheme, self.0, path_and_query))
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackendAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for BackendAddress {
    fn from(address: String) -> Self {
        Self(Arc::from(address))
    }
}
