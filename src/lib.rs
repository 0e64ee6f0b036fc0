//! Stream Loader
//!
//! Delivers batches of JSON rows to a pool of stream load endpoints over
//! HTTP, failing over between endpoints and classifying every outcome.

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod etl;
pub mod loader;
pub mod storage;

// Re-exports for convenience
pub use batch::{Batch, encode};
pub use client::{CredentialProvider, Credentials, EnvCredentials, LoadResult, LoadStatus};
pub use config::LoadConfig;
pub use endpoint::{Endpoint, EndpointSelector, Probe, TcpProbe};
pub use error::LoadError;
pub use etl::{BatchLimits, Extractor, Loader, Pipeline, PipelineSummary};
pub use loader::StreamLoader;
pub use storage::NdjsonReader;
