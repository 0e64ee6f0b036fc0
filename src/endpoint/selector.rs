use super::{Endpoint, Probe, TcpProbe};

/// Round-robin endpoint selection that skips unreachable candidates
///
/// The cursor survives across calls: every probe, successful or not, moves
/// it one step, so consecutive selections rotate through the pool instead of
/// hammering the first live node or re-probing dead ones from the start.
#[derive(Debug)]
pub struct EndpointSelector<P = TcpProbe> {
    endpoints: Vec<Endpoint>,
    cursor: usize,
    probe: P,
}

impl<P: Probe> EndpointSelector<P> {
    pub fn new(endpoints: Vec<Endpoint>, probe: P) -> Self {
        Self {
            endpoints,
            cursor: 0,
            probe,
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Index of the next endpoint to probe
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the next reachable endpoint, or `None` if the whole pool is down.
    ///
    /// Each endpoint is probed at most once per call, starting at the cursor
    /// and wrapping around the end of the pool. When nothing answers the
    /// cursor goes back to the first endpoint.
    pub async fn select(&mut self) -> Option<Endpoint> {
        let len = self.endpoints.len();
        if self.cursor >= len {
            self.cursor = 0;
        }

        for _ in 0..len {
            let candidate = &self.endpoints[self.cursor];
            self.cursor = (self.cursor + 1) % len;
            if self.probe.is_reachable(candidate).await {
                log::debug!("Selected endpoint {}", candidate);
                return Some(candidate.clone());
            }
        }

        self.cursor = 0;
        None
    }

    /// Probe every endpoint once, leaving the cursor untouched
    pub async fn probe_all(&self) -> Vec<(Endpoint, bool)> {
        let mut report = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let reachable = self.probe.is_reachable(endpoint).await;
            report.push((endpoint.clone(), reachable));
        }
        report
    }
}
