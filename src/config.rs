//! Load configuration
//!
//! Everything a loader needs to address a table and authenticate against it.
//! The configuration is fixed for the lifetime of a loader.

use crate::client::Credentials;
use crate::error::LoadError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

/// Target table, endpoints, and request options for stream loads
///
/// Deserializes from snake_case keys. The option names of the classic
/// stream load writer (`beLoadUrl`, `column`, `loadProps`) are accepted as
/// aliases.
///
/// # Example
/// ```
/// use stream_loader::{Credentials, LoadConfig};
///
/// let config = LoadConfig::new(
///     ["node1:8040", "node2:8040"],
///     "mydb",
///     "mytable",
///     Credentials::new("root", ""),
/// )
/// .with_columns(["id", "name"])
/// .with_load_prop("max_filter_ratio", 0.1);
///
/// assert_eq!(config.load_path(), "/api/mydb/mytable/_stream_load");
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct LoadConfig {
    /// Load endpoint addresses, `host:port` or `http://host:port`
    #[serde(alias = "beLoadUrl")]
    pub endpoints: Vec<String>,
    pub database: String,
    pub table: String,
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Explicit column list sent as the `columns` header
    #[serde(default, alias = "column")]
    pub columns: Vec<String>,
    /// Free-form properties, each forwarded as a request header
    #[serde(default, alias = "loadProps")]
    pub load_props: BTreeMap<String, Value>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Overall timeout of the load request; unbounded when absent
    #[serde(default)]
    pub load_timeout_ms: Option<u64>,
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

impl LoadConfig {
    pub fn new<I, S>(
        endpoints: I,
        database: impl Into<String>,
        table: impl Into<String>,
        credentials: Credentials,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            database: database.into(),
            table: table.into(),
            credentials,
            columns: Vec::new(),
            load_props: BTreeMap::new(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            load_timeout_ms: None,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_load_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.load_props.insert(key.into(), value.into());
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = millis(timeout);
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_ms = Some(millis(timeout));
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }

    /// Path of the stream load API for the configured table
    pub fn load_path(&self) -> String {
        format!("/api/{}/{}/_stream_load", self.database, self.table)
    }

    /// Check the fields a request cannot be built without.
    ///
    /// An empty endpoint list is allowed; loads then fail with
    /// [`LoadError::EndpointUnavailable`].
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.database.trim().is_empty() {
            return Err(LoadError::InvalidConfig("database must not be empty".to_string()));
        }
        if self.table.trim().is_empty() {
            return Err(LoadError::InvalidConfig("table must not be empty".to_string()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(LoadError::InvalidConfig(
                "probe_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Render a load property as header text.
///
/// Strings are sent verbatim; every other value is sent as its JSON text.
pub fn header_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whole milliseconds of `timeout`, saturating at `u64::MAX`
fn millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
