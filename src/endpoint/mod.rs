//! Load endpoints and failover selection.
//!
//! An [`EndpointSelector`] owns the endpoint pool and a cursor, and hands out
//! the next endpoint that accepts a connection according to its [`Probe`].

mod probe;
mod selector;

pub use probe::{Probe, TcpProbe};
pub use selector::EndpointSelector;

use crate::error::LoadError;
use url::Url;

/// One load endpoint, rendered as its base URL (`http://host:port`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    base: String,
    authority: String,
}

impl Endpoint {
    /// Parse `host:port` or `http(s)://host:port`.
    ///
    /// Addresses without a scheme are taken as plain HTTP.
    pub fn parse(address: &str) -> Result<Self, LoadError> {
        let address = address.trim();
        let with_scheme = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        let url = Url::parse(&with_scheme).map_err(|e| {
            LoadError::InvalidConfig(format!("invalid endpoint '{}': {}", address, e))
        })?;
        let host = url.host_str().ok_or_else(|| {
            LoadError::InvalidConfig(format!("endpoint '{}' has no host", address))
        })?;
        let port = url.port_or_known_default().ok_or_else(|| {
            LoadError::InvalidConfig(format!("endpoint '{}' has no port", address))
        })?;

        Ok(Self {
            base: with_scheme.trim_end_matches('/').to_string(),
            authority: format!("{}:{}", host, port),
        })
    }

    /// Parse every address, failing on the first invalid one
    pub fn parse_all<S: AsRef<str>>(addresses: &[S]) -> Result<Vec<Self>, LoadError> {
        addresses.iter().map(|a| Self::parse(a.as_ref())).collect()
    }

    /// Base URL without a trailing slash
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// `host:port` used for connectivity probes
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Full URL for `path`, which must start with `/`
    pub fn url(&self, path: &str) -> Result<Url, LoadError> {
        let joined = format!("{}{}", self.base, path);
        Url::parse(&joined)
            .map_err(|e| LoadError::InvalidRequest(format!("invalid load URL '{}': {}", joined, e)))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}
