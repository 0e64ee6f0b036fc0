//! Extract and load abstractions for driving the loader from a row source
//!
//! This module provides trait definitions for pipelines that extract
//! pre-serialized rows from a source, cut them into batches, and hand each
//! batch to a loader.

mod extract;
mod load;
mod pipeline;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{BatchLimits, DEFAULT_LABEL_PREFIX, Pipeline, PipelineSummary, split_batches};
