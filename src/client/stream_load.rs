//! Stream load HTTP client
//!
//! Builds the `PUT .../_stream_load` request, follows the coordinator's
//! redirect to the ingesting node, and turns the response into a
//! [`LoadResult`] or a [`LoadError`].

use super::{CredentialProvider, LoadResult};
use crate::config::{LoadConfig, header_text};
use crate::error::LoadError;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, EXPECT, HeaderMap, HeaderName, HeaderValue, LOCATION,
};
use reqwest::{Client, Response, StatusCode, redirect};
use url::Url;

/// Upper bound on redirect hops within one load
pub const MAX_REDIRECTS: usize = 10;

/// HTTP client issuing stream load requests for one target table.
///
/// Headers derived from the configuration (`columns` and load properties) are
/// validated once at construction. Per-request headers (`label`,
/// `Authorization`) are added on every call.
pub struct StreamLoadClient {
    client: Client,
    headers: HeaderMap,
    credentials: Box<dyn CredentialProvider>,
}

impl StreamLoadClient {
    /// Create a client for the given configuration and credential source.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidRequest`] if a column list or load property
    /// cannot be sent as a header, or [`LoadError::Transport`] if the HTTP
    /// client cannot be built.
    pub fn try_new(
        config: &LoadConfig,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, LoadError> {
        // Redirects are followed by hand so method, body and credentials survive the hop
        let mut builder = Client::builder()
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0);
        if let Some(timeout) = config.load_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            headers: config_headers(config)?,
            credentials,
        })
    }

    /// Full header set for a load labelled `label`.
    ///
    /// Fixed protocol headers are applied after the load properties and win
    /// over a property of the same name.
    pub fn request_headers(&self, label: &str) -> Result<HeaderMap, LoadError> {
        let mut headers = self.headers.clone();
        headers.insert(EXPECT, HeaderValue::from_static("100-continue"));
        headers.insert("label", header_value("label", label)?);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut authorization =
            header_value("Authorization", &self.credentials.credentials()?.authorization())?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert("format", HeaderValue::from_static("json"));
        headers.insert("strip_outer_array", HeaderValue::from_static("true"));
        Ok(headers)
    }

    /// Send `payload` to `url` and interpret the answer.
    ///
    /// # Errors
    /// - [`LoadError::BadResponse`] for any final status other than 200
    /// - [`LoadError::EmptyResponse`] for a 200 without a body
    /// - [`LoadError::MalformedResult`] if the body has no readable `Status`
    /// - [`LoadError::ServerRejected`] if `Status` is `Fail`
    /// - [`LoadError::Transport`] for network failures
    pub async fn put(
        &self,
        url: Url,
        label: &str,
        payload: Vec<u8>,
    ) -> Result<LoadResult, LoadError> {
        let headers = self.request_headers(label)?;
        log::info!(
            "Executing stream load to: '{}', size: '{}'",
            redacted(&url),
            payload.len()
        );

        let (url, response) = self.send_following_redirects(url, &headers, payload).await?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("Request failed with code: {}", status);
            return Err(LoadError::BadResponse {
                url: redacted(&url),
                status,
            });
        }

        let body = response.text().await.map_err(|e| transport_error(&url, e))?;
        if body.trim().is_empty() {
            log::warn!("Request failed with empty response.");
            return Err(LoadError::EmptyResponse {
                url: redacted(&url),
            });
        }

        let result = LoadResult::parse(&body)?;
        log::debug!("Stream load response:\n{}", result.to_json_pretty());
        if result.status().is_fail() {
            return Err(LoadError::ServerRejected(Box::new(result)));
        }
        Ok(result)
    }

    /// PUT to `url`, re-sending the same request to every `Location` a 3xx
    /// answer points at. Returns the last URL requested with its response.
    async fn send_following_redirects(
        &self,
        mut url: Url,
        headers: &HeaderMap,
        payload: Vec<u8>,
    ) -> Result<(Url, Response), LoadError> {
        let mut hops = 0;
        loop {
            let response = self
                .client
                .put(url.clone())
                .headers(headers.clone())
                .body(payload.clone())
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;

            let status = response.status();
            if !status.is_redirection() {
                return Ok((url, response));
            }
            let location = match response.headers().get(LOCATION).cloned() {
                Some(location) => location,
                None => return Ok((url, response)),
            };
            if hops == MAX_REDIRECTS {
                return Err(LoadError::TooManyRedirects {
                    url: redacted(&url),
                    limit: MAX_REDIRECTS,
                });
            }

            let location = location.to_str().map_err(|e| {
                LoadError::InvalidRequest(format!(
                    "redirect location from {} is not text: {}",
                    redacted(&url),
                    e
                ))
            })?;
            let next = url.join(location).map_err(|e| {
                LoadError::InvalidRequest(format!(
                    "redirect location from {} is invalid: {}",
                    redacted(&url),
                    e
                ))
            })?;
            log::debug!(
                "Following {} redirect from {} to {}",
                status,
                redacted(&url),
                redacted(&next)
            );

            url = next;
            hops += 1;
        }
    }
}

impl std::fmt::Debug for StreamLoadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLoadClient")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// `columns` and load property headers, in that order
fn config_headers(config: &LoadConfig) -> Result<HeaderMap, LoadError> {
    let mut headers = HeaderMap::new();
    if !config.columns.is_empty() {
        headers.insert("columns", header_value("columns", &config.columns.join(","))?);
    }
    for (key, value) in &config.load_props {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            LoadError::InvalidRequest(format!("load property '{}' is not a valid header name", key))
        })?;
        headers.insert(name, header_value(key, &header_text(value))?);
    }
    Ok(headers)
}

/// Wrap a reqwest failure, dropping its URL when that URL carries userinfo
fn transport_error(url: &Url, err: reqwest::Error) -> LoadError {
    match url.username().is_empty() && url.password().is_none() {
        true => LoadError::Transport(err),
        false => LoadError::Transport(err.without_url()),
    }
}

/// `url` without userinfo, for logs and errors
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.to_string()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, LoadError> {
    HeaderValue::from_str(value).map_err(|_| {
        LoadError::InvalidRequest(format!(
            "value of header '{}' is not valid header text",
            name
        ))
    })
}
