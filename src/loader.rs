//! The batch loader: endpoint failover plus one stream load per batch

use crate::batch::Batch;
use crate::client::{CredentialProvider, LoadResult, LoadStatus, StreamLoadClient};
use crate::config::LoadConfig;
use crate::endpoint::{Endpoint, EndpointSelector, Probe, TcpProbe};
use crate::error::LoadError;
use crate::etl::Loader;

/// Delivers batches to the first reachable endpoint of a pool.
///
/// Each call to [`load`](Self::load) makes exactly one load attempt. The
/// endpoint cursor lives in the loader, so a loader is used by one task at a
/// time; run one loader per parallel writer.
///
/// # Example
/// ```no_run
/// use stream_loader::{Batch, Credentials, LoadConfig, StreamLoader};
///
/// # async fn example() -> Result<(), stream_loader::LoadError> {
/// let config = LoadConfig::new(
///     ["node1:8040", "node2:8040"],
///     "mydb",
///     "mytable",
///     Credentials::new("root", ""),
/// );
/// let mut loader = StreamLoader::new(config)?;
///
/// let batch = Batch::with_generated_label(
///     "sload_",
///     vec![r#"{"id":1}"#.to_string(), r#"{"id":2}"#.to_string()],
/// );
/// let result = loader.load(&batch).await?;
/// println!("{} rows loaded", result.loaded_rows().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StreamLoader<P = TcpProbe> {
    config: LoadConfig,
    selector: EndpointSelector<P>,
    client: StreamLoadClient,
}

impl StreamLoader<TcpProbe> {
    /// Create a loader probing endpoints over TCP and authenticating with
    /// the configured credentials.
    pub fn new(config: LoadConfig) -> Result<Self, LoadError> {
        let probe = TcpProbe::new(config.probe_timeout());
        let credentials = Box::new(config.credentials.clone());
        Self::with_parts(config, probe, credentials)
    }
}

impl<P: Probe> StreamLoader<P> {
    /// Create a loader with a custom probe and credential source.
    ///
    /// The credentials in `config` are ignored in favor of `credentials`.
    pub fn with_parts(
        config: LoadConfig,
        probe: P,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        let endpoints = Endpoint::parse_all(&config.endpoints)?;
        let client = StreamLoadClient::try_new(&config, credentials)?;

        Ok(Self {
            selector: EndpointSelector::new(endpoints, probe),
            client,
            config,
        })
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    pub fn selector(&self) -> &EndpointSelector<P> {
        &self.selector
    }

    /// Load one batch.
    ///
    /// # Errors
    /// [`LoadError::EndpointUnavailable`] when no endpoint accepts a
    /// connection (nothing is sent), otherwise any error of
    /// [`StreamLoadClient::put`].
    pub async fn load(&mut self, batch: &Batch) -> Result<LoadResult, LoadError> {
        let Some(endpoint) = self.selector.select().await else {
            let pool = self.selector.endpoints().iter().map(ToString::to_string).collect();
            return Err(LoadError::EndpointUnavailable(pool));
        };
        let url = endpoint.url(&self.config.load_path())?;

        log::info!(
            "Start to join batch data: rows[{}] bytes[{}] label[{}].",
            batch.len(),
            batch.bytes(),
            batch.label()
        );
        let result = self.client.put(url, batch.label(), batch.payload()).await?;

        match result.status() {
            LoadStatus::Success => log::info!(
                "Stream load of label[{}] succeeded: {} row(s) loaded",
                batch.label(),
                result.loaded_rows().unwrap_or_default()
            ),
            other => log::warn!(
                "Stream load of label[{}] finished with status '{}', treating it as loaded",
                batch.label(),
                other
            ),
        }
        Ok(result)
    }

    /// Reachability of every endpoint, without moving the cursor
    pub async fn probe(&self) -> Vec<(Endpoint, bool)> {
        self.selector.probe_all().await
    }
}

impl<P: Probe> Loader for StreamLoader<P> {
    async fn load(&mut self, batch: &Batch) -> Result<LoadResult, LoadError> {
        StreamLoader::load(self, batch).await
    }
}
