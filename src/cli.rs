//! CLI helper functions

use crate::{
    client::Credentials,
    config::LoadConfig,
    endpoint::Endpoint,
    etl::{BatchLimits, DEFAULT_LABEL_PREFIX, Pipeline, PipelineSummary},
    loader::StreamLoader,
    storage::NdjsonReader,
};
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Options of a file load
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub label_prefix: String,
    pub limits: BatchLimits,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            limits: BatchLimits::default(),
        }
    }
}

/// Load the stream load configuration from environment variables
///
/// Expected environment variables:
/// - STREAM_LOAD_ENDPOINTS: Comma-separated `host:port` list (required)
/// - STREAM_LOAD_DATABASE: Target database (required)
/// - STREAM_LOAD_TABLE: Target table (required)
/// - STREAM_LOAD_USERNAME: Username for basic auth (required)
/// - STREAM_LOAD_PASSWORD: Password for basic auth (optional, defaults to empty)
/// - STREAM_LOAD_COLUMNS: Comma-separated column list (optional)
/// - STREAM_LOAD_PROPS: JSON object of load properties (optional)
/// - STREAM_LOAD_PROBE_TIMEOUT_MS: Connectivity probe timeout (optional)
/// - STREAM_LOAD_TIMEOUT_MS: Load request timeout (optional)
pub fn load_config_from_env() -> Result<LoadConfig> {
    let endpoints = split_list(&required_var("STREAM_LOAD_ENDPOINTS")?);
    let database = required_var("STREAM_LOAD_DATABASE")?;
    let table = required_var("STREAM_LOAD_TABLE")?;
    let username = required_var("STREAM_LOAD_USERNAME")?;
    let password = std::env::var("STREAM_LOAD_PASSWORD").unwrap_or_default();

    let mut config = LoadConfig::new(
        endpoints,
        database,
        table,
        Credentials::new(username, password),
    );

    if let Ok(columns) = std::env::var("STREAM_LOAD_COLUMNS") {
        config = config.with_columns(split_list(&columns));
    }

    if let Ok(props) = std::env::var("STREAM_LOAD_PROPS") {
        config.load_props = serde_json::from_str::<BTreeMap<String, Value>>(&props)
            .with_context(|| format!("Invalid STREAM_LOAD_PROPS: {}", props))?;
    }

    if let Some(timeout) = optional_millis("STREAM_LOAD_PROBE_TIMEOUT_MS")? {
        config.probe_timeout_ms = timeout;
    }
    config.load_timeout_ms = optional_millis("STREAM_LOAD_TIMEOUT_MS")?;

    config.validate().context("Invalid stream load configuration")?;
    Ok(config)
}

/// Load an NDJSON file into the configured table
///
/// Pipeline: NdjsonReader → batches within `options.limits` → StreamLoader
pub async fn load_file(
    config: LoadConfig,
    path: impl AsRef<Path>,
    options: LoadOptions,
) -> Result<PipelineSummary> {
    let path = path.as_ref();
    log::info!(
        "Loading {} into {}.{}",
        path.display(),
        config.database,
        config.table
    );

    let loader = StreamLoader::new(config).context("Failed to create stream loader")?;
    let mut pipeline = Pipeline::new(NdjsonReader::new(path), loader)
        .with_limits(options.limits)
        .with_label_prefix(options.label_prefix);

    pipeline.run().await
}

/// Probe every configured endpoint once
pub async fn probe_endpoints(config: LoadConfig) -> Result<Vec<(Endpoint, bool)>> {
    let loader = StreamLoader::new(config).context("Failed to create stream loader")?;
    Ok(loader.probe().await)
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} environment variable not set", name))
}

fn optional_millis(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => {
            let millis = value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {}: {}", name, value))?;
            Ok(Some(millis))
        }
        Err(_) => Ok(None),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
