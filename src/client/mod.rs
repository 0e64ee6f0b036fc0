//! Stream load HTTP client, credentials, and result parsing.
//!
//! [`StreamLoadClient`] issues the load request, [`CredentialProvider`]
//! supplies Basic auth for it, and [`LoadResult`] is what a successful call
//! returns.

mod auth;
mod response;
mod stream_load;

pub use auth::{CredentialProvider, Credentials, EnvCredentials};
pub use response::{LoadResult, LoadStatus};
pub use stream_load::{MAX_REDIRECTS, StreamLoadClient};
