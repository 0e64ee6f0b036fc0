//! Pipeline orchestration: extract rows, cut batches, load each batch

use super::{Extractor, Loader};
use crate::batch::Batch;
use eyre::{Context, Result};

/// Default label prefix for generated batch labels
pub const DEFAULT_LABEL_PREFIX: &str = "sload_";

/// Thresholds at which the pipeline starts a new batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_rows: usize,
    pub max_bytes: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_rows: 500_000,
            max_bytes: 90 * 1024 * 1024,
        }
    }
}

/// What a completed pipeline run delivered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub batches: usize,
    pub rows: usize,
    pub bytes: usize,
}

/// Pipeline that extracts rows and loads them batch by batch
///
/// # Type Parameters
/// - `E`: Extractor producing pre-serialized rows
/// - `L`: Loader receiving each batch
///
/// # Example
/// ```no_run
/// use stream_loader::etl::{BatchLimits, Pipeline};
/// use stream_loader::storage::NdjsonReader;
/// use stream_loader::{Credentials, LoadConfig, StreamLoader};
///
/// # async fn example() -> eyre::Result<()> {
/// let config = LoadConfig::new(["node1:8040"], "mydb", "mytable", Credentials::new("root", ""));
/// let mut pipeline = Pipeline::new(NdjsonReader::new("rows.ndjson"), StreamLoader::new(config)?)
///     .with_limits(BatchLimits { max_rows: 10_000, max_bytes: 16 * 1024 * 1024 });
///
/// let summary = pipeline.run().await?;
/// println!("Loaded {} rows in {} batches", summary.rows, summary.batches);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, L> {
    extractor: E,
    loader: L,
    limits: BatchLimits,
    label_prefix: String,
}

impl<E, L> Pipeline<E, L>
where
    E: Extractor<Item = String>,
    L: Loader,
{
    /// Create a new pipeline with default limits and label prefix
    pub fn new(extractor: E, loader: L) -> Self {
        Self {
            extractor,
            loader,
            limits: BatchLimits::default(),
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
        }
    }

    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Run the complete pipeline
    ///
    /// Steps:
    /// 1. Extract rows from source
    /// 2. Split rows into batches within the configured limits
    /// 3. Load batches in order, each with a freshly generated label
    ///
    /// # Errors
    /// Returns an error if extraction fails or as soon as one batch fails to
    /// load; later batches are not attempted.
    pub async fn run(&mut self) -> Result<PipelineSummary> {
        log::info!("Starting stream load pipeline");

        log::debug!("Extracting rows from source...");
        let rows = self.extractor.extract().await?;
        log::info!("Extracted {} rows", rows.len());

        let mut summary = PipelineSummary::default();
        if rows.is_empty() {
            log::warn!("No rows extracted, pipeline complete");
            return Ok(summary);
        }

        let batches = split_batches(rows, &self.limits);
        let total = batches.len();
        for (index, rows) in batches.into_iter().enumerate() {
            let batch = Batch::with_generated_label(&self.label_prefix, rows);
            log::debug!("Loading batch {}/{} ({})", index + 1, total, batch.label());

            self.loader.load(&batch).await.with_context(|| {
                format!(
                    "Failed to load batch {}/{} (label {})",
                    index + 1,
                    total,
                    batch.label()
                )
            })?;

            summary.batches += 1;
            summary.rows += batch.len();
            summary.bytes += batch.bytes();
        }

        log::info!(
            "Loaded {} rows ({} bytes) in {} batch(es)",
            summary.rows,
            summary.bytes,
            summary.batches
        );
        Ok(summary)
    }
}

/// Split rows into consecutive groups within `limits`.
///
/// A group is closed before the row that would push it past either limit,
/// so every group holds at least one row even when a single row is larger
/// than `max_bytes`.
pub fn split_batches(rows: Vec<String>, limits: &BatchLimits) -> Vec<Vec<String>> {
    let mut batches = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_bytes = 0;

    for row in rows {
        let full = current.len() + 1 > limits.max_rows
            || current_bytes + row.len() > limits.max_bytes;
        if !current.is_empty() && full {
            batches.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current_bytes += row.len();
        current.push(row);
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
