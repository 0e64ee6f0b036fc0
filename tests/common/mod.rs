//! In-process stream load endpoint for integration tests
//!
//! Serves every path with an axum fallback handler that records the request
//! and answers with the same canned response.

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Response returned for every request
#[derive(Clone, Debug)]
pub struct CannedResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
    delay: Option<Duration>,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: Vec::new(),
            body: body.into(),
            delay: None,
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(307, "").with_header("Location", location)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Hold the answer back for `delay` after the request arrives
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        headers
    }
}

/// One request as seen by the endpoint
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: String,
    /// Path and query
    pub path: String,
    /// Header names are lowercased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[derive(Clone)]
struct EndpointState {
    response: CannedResponse,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn capture(
    State(state): State<EndpointState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(k, v)| {
            let value = String::from_utf8_lossy(v.as_bytes()).to_string();
            (k.as_str().to_string(), value)
        })
        .collect();
    state.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path,
        headers,
        body: body.to_vec(),
    });

    let response = state.response;
    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    (response.status, response.headers(), response.body).into_response()
}

pub struct MockEndpoint {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockEndpoint {
    pub async fn start(response: CannedResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = EndpointState {
            response,
            requests: requests.clone(),
        };
        let app = Router::new().fallback(capture).with_state(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            address,
            requests,
            handle,
        }
    }

    /// `127.0.0.1:<port>`
    pub fn address(&self) -> String {
        self.address.to_string()
    }

    /// `http://127.0.0.1:<port>`
    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing is listening on
pub fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);
    address
}

/// A listener that accepts every connection and closes it without a reply
///
/// Connects succeed, so the address passes a connectivity check, but any
/// HTTP request sent to it fails mid-exchange.
pub async fn hang_up_address() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    (address, handle)
}
