use super::Endpoint;
use std::time::Duration;
use tokio::net::TcpStream;

/// Connectivity check used while selecting an endpoint
///
/// A probe never fails loudly: anything short of a confirmed connection
/// counts as unreachable.
pub trait Probe: Send + Sync {
    fn is_reachable(&self, endpoint: &Endpoint) -> impl std::future::Future<Output = bool> + Send;
}

/// Opens and immediately drops a TCP connection, bounded by a timeout
#[derive(Clone, Debug)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Probe for TcpProbe {
    async fn is_reachable(&self, endpoint: &Endpoint) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(endpoint.authority())).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                log::warn!("Failed to connect to address: {}, error: {}", endpoint, e);
                false
            }
            Err(_) => {
                log::warn!(
                    "Failed to connect to address: {}, timed out after {:?}",
                    endpoint,
                    self.timeout
                );
                false
            }
        }
    }
}
