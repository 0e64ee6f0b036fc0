//! Error taxonomy for a single stream load call

use crate::client::LoadResult;
use reqwest::StatusCode;
use thiserror::Error;

/// Every way a call to [`StreamLoader::load`](crate::StreamLoader::load) can fail.
///
/// All variants are fatal for the call that produced them. Retrying is left
/// to the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No endpoint in the pool accepted a connection; nothing was sent.
    #[error("none of the endpoints [{}] could be connected", .0.join(", "))]
    EndpointUnavailable(Vec<String>),

    /// The endpoint answered with something other than `200 OK`.
    #[error("stream load to {url} failed with HTTP status {status}")]
    BadResponse { url: String, status: StatusCode },

    /// `200 OK` with no body to interpret.
    #[error("stream load to {url} returned an empty response")]
    EmptyResponse { url: String },

    /// The body is not a JSON object carrying a `Status` field.
    #[error("unable to interpret stream load result: {reason}")]
    MalformedResult { reason: String },

    /// The endpoint reported `"Status": "Fail"`.
    #[error("stream load was rejected by the server:\n{}", .0.to_json_pretty())]
    ServerRejected(Box<LoadResult>),

    #[error("stream load to {url} exceeded {limit} redirects")]
    TooManyRedirects { url: String, limit: usize },

    /// A header or URL built from configuration is not valid on the wire.
    #[error("invalid stream load request: {0}")]
    InvalidRequest(String),

    #[error("invalid stream load configuration: {0}")]
    InvalidConfig(String),

    #[error("unable to resolve credentials: {0}")]
    Credentials(String),

    /// Connection resets, timeouts and other network failures of the load request.
    #[error("stream load transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LoadError {
    /// The server's result document, when the server explicitly rejected the load.
    pub fn load_result(&self) -> Option<&LoadResult> {
        match self {
            Self::ServerRejected(result) => Some(result),
            _ => None,
        }
    }
}
