//! Loader trait for delivering batches to a destination

use crate::batch::Batch;
use crate::client::LoadResult;
use crate::error::LoadError;

/// Loader trait for delivering one batch at a time
///
/// [`StreamLoader`](crate::StreamLoader) is the production implementation.
/// Loaders take `&mut self` because they may carry per-call state such as an
/// endpoint cursor.
///
/// # Example
/// ```no_run
/// use stream_loader::batch::Batch;
/// use stream_loader::client::LoadResult;
/// use stream_loader::error::LoadError;
/// use stream_loader::etl::Loader;
///
/// struct StdoutLoader;
///
/// impl Loader for StdoutLoader {
///     async fn load(&mut self, batch: &Batch) -> Result<LoadResult, LoadError> {
///         println!("{}", String::from_utf8_lossy(&batch.payload()));
///         LoadResult::parse(r#"{"Status":"Success"}"#)
///     }
/// }
/// ```
pub trait Loader: Send {
    /// Deliver `batch`, making exactly one attempt
    ///
    /// # Errors
    /// Returns an error if the batch was not accepted by the destination
    fn load(
        &mut self,
        batch: &Batch,
    ) -> impl std::future::Future<Output = Result<LoadResult, LoadError>> + Send;
}
