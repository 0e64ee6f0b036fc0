//! Extractor trait for reading rows from a source

use eyre::Result;

/// Extractor trait for extracting rows from a source
///
/// Implementors define where pre-serialized rows come from:
/// - NDJSON files
/// - Message queues
/// - Upstream pipeline stages
///
/// # Example
/// ```no_run
/// use stream_loader::etl::Extractor;
/// use eyre::Result;
///
/// struct StaticRows(Vec<String>);
///
/// impl Extractor for StaticRows {
///     type Item = String;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
