//! File system row sources
//!
//! Reads rows for the pipeline from local files:
//! - NDJSON files, one pre-serialized row per line

mod ndjson;

pub use ndjson::NdjsonReader;
