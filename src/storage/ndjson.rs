//! NDJSON (Newline Delimited JSON) row source

use crate::etl::Extractor;

use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// Read rows from an NDJSON file
///
/// Each non-blank line is one row. Lines are checked to be JSON but passed
/// on exactly as written, so the payload carries the producer's bytes.
pub struct NdjsonReader {
    path: PathBuf,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all non-blank lines as rows
    pub fn read(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read NDJSON file: {}", self.path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| -> Result<String> {
                let row = line.trim();
                serde_json::from_str::<serde_json::Value>(row).with_context(|| {
                    format!(
                        "Failed to parse JSON on line {} of {}",
                        index + 1,
                        self.path.display()
                    )
                })?;
                Ok(row.to_string())
            })
            .collect()
    }
}

impl Extractor for NdjsonReader {
    type Item = String;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        self.read()
    }
}
