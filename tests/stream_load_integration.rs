//! Integration tests for stream loads against a local endpoint
//!
//! Each test starts one or more in-process endpoints that answer with a
//! canned response and inspects what the loader sent.

mod common;

use common::{CannedResponse, MockEndpoint, closed_address, hang_up_address};
use eyre::Result;
use reqwest::StatusCode;
use std::time::Duration;
use stream_loader::client::MAX_REDIRECTS;
use stream_loader::{Batch, Credentials, LoadConfig, LoadError, LoadStatus, StreamLoader};

const SUCCESS: &str =
    r#"{"TxnId":7,"Label":"label-1","Status":"Success","Message":"OK","NumberLoadedRows":2}"#;

fn config(endpoints: Vec<String>) -> LoadConfig {
    LoadConfig::new(endpoints, "mydb", "mytable", Credentials::new("root", "secret"))
}

fn batch() -> Batch {
    Batch::new(
        "label-1",
        vec![r#"{"id":1}"#.to_string(), r#"{"id":2}"#.to_string()],
    )
}

#[tokio::test]
async fn test_fails_over_to_reachable_endpoint() -> Result<()> {
    let node2 = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let mut loader = StreamLoader::new(config(vec![closed_address(), node2.address()]))?;

    let result = loader.load(&batch()).await?;
    assert_eq!(result.status(), &LoadStatus::Success);
    assert_eq!(result.txn_id(), Some(7));
    assert_eq!(result.loaded_rows(), Some(2));

    let requests = node2.requests();
    assert_eq!(requests.len(), 1, "exactly one load attempt");
    let request = &requests[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/mydb/mytable/_stream_load");
    assert_eq!(request.body_text(), r#"[{"id":1},{"id":2}]"#);

    Ok(())
}

#[tokio::test]
async fn test_request_headers_on_the_wire() -> Result<()> {
    let node = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let config = config(vec![node.address()])
        .with_columns(["id", "name"])
        .with_load_prop("max_filter_ratio", 0.1)
        .with_load_prop("format", "csv");
    let mut loader = StreamLoader::new(config)?;

    loader.load(&batch()).await?;

    let request = &node.requests()[0];
    assert_eq!(request.header("expect"), Some("100-continue"));
    assert_eq!(request.header("label"), Some("label-1"));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        request.header("authorization"),
        Some("Basic cm9vdDpzZWNyZXQ=")
    );
    assert_eq!(request.header("format"), Some("json"));
    assert_eq!(request.header("strip_outer_array"), Some("true"));
    assert_eq!(request.header("columns"), Some("id,name"));
    assert_eq!(request.header("max_filter_ratio"), Some("0.1"));

    Ok(())
}

#[tokio::test]
async fn test_fail_status_is_server_rejected() {
    let body = r#"{"Status":"Fail","Message":"too many filtered rows","NumberFilteredRows":2}"#;
    let node = MockEndpoint::start(CannedResponse::ok(body)).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    let result = err.load_result().expect("rejection carries the result document");
    assert_eq!(result.status(), &LoadStatus::Fail);
    assert_eq!(result.message(), Some("too many filtered rows"));
    assert_eq!(result.filtered_rows(), Some(2));
    assert!(err.to_string().contains("too many filtered rows"));
}

#[tokio::test]
async fn test_non_success_status_is_still_success() -> Result<()> {
    let node = MockEndpoint::start(CannedResponse::ok(r#"{"Status":"Publish Timeout"}"#)).await;
    let mut loader = StreamLoader::new(config(vec![node.address()]))?;

    let result = loader.load(&batch()).await?;
    assert_eq!(result.status(), &LoadStatus::PublishTimeout);

    Ok(())
}

#[tokio::test]
async fn test_non_200_is_bad_response_without_parsing() {
    // A body that would otherwise be a rejection
    let response = CannedResponse::new(500, r#"{"Status":"Fail"}"#);
    let node = MockEndpoint::start(response).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    match err {
        LoadError::BadResponse { url, status } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(url.ends_with("/api/mydb/mytable/_stream_load"));
        }
        other => panic!("expected BadResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_body_is_empty_response() {
    let node = MockEndpoint::start(CannedResponse::ok("")).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::EmptyResponse { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let node = MockEndpoint::start(CannedResponse::ok("<html>proxy error</html>")).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::MalformedResult { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_missing_status_is_malformed() {
    let node = MockEndpoint::start(CannedResponse::ok(r#"{"Message":"OK"}"#)).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::MalformedResult { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_all_endpoints_unreachable() {
    let mut loader = StreamLoader::new(config(vec![closed_address(), closed_address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::EndpointUnavailable(ref pool) if pool.len() == 2));
    assert_eq!(loader.selector().cursor(), 0);
}

#[tokio::test]
async fn test_redirect_keeps_method_body_and_credentials() -> Result<()> {
    let backend = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let location = format!("{}/api/mydb/mytable/_stream_load?from=fe", backend.url());
    let frontend = MockEndpoint::start(CannedResponse::redirect(location)).await;
    let mut loader = StreamLoader::new(config(vec![frontend.address()]))?;

    let result = loader.load(&batch()).await?;
    assert_eq!(result.status(), &LoadStatus::Success);

    assert_eq!(frontend.requests().len(), 1);
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let forwarded = &requests[0];
    assert_eq!(forwarded.method, "PUT");
    assert_eq!(forwarded.path, "/api/mydb/mytable/_stream_load?from=fe");
    assert_eq!(forwarded.body_text(), r#"[{"id":1},{"id":2}]"#);
    assert_eq!(
        forwarded.header("authorization"),
        Some("Basic cm9vdDpzZWNyZXQ=")
    );
    assert_eq!(forwarded.header("label"), Some("label-1"));

    Ok(())
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let redirect = CannedResponse::redirect("/api/mydb/mytable/_stream_load");
    let node = MockEndpoint::start(redirect).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::TooManyRedirects { limit, .. } if limit == MAX_REDIRECTS));
    assert_eq!(node.requests().len(), MAX_REDIRECTS + 1);
}

#[tokio::test]
async fn test_redirect_without_location_is_bad_response() {
    let node = MockEndpoint::start(CannedResponse::new(307, "")).await;
    let mut loader = StreamLoader::new(config(vec![node.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(
        err,
        LoadError::BadResponse { status, .. } if status == StatusCode::TEMPORARY_REDIRECT
    ));
}

#[tokio::test]
async fn test_consecutive_loads_rotate_endpoints() -> Result<()> {
    let node1 = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let node2 = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let mut loader = StreamLoader::new(config(vec![node1.address(), node2.address()]))?;

    loader.load(&batch()).await?;
    loader.load(&batch()).await?;
    loader.load(&batch()).await?;

    assert_eq!(node1.requests().len(), 2);
    assert_eq!(node2.requests().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_probe_reports_each_endpoint() -> Result<()> {
    let node = MockEndpoint::start(CannedResponse::ok(SUCCESS)).await;
    let dead = closed_address();
    let loader = StreamLoader::new(config(vec![dead.clone(), node.address()]))?;

    let report = loader.probe().await;
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].0.authority(), dead);
    assert!(!report[0].1);
    assert!(report[1].1);
    assert!(node.requests().is_empty(), "probes send no HTTP request");

    Ok(())
}

#[tokio::test]
async fn test_redirect_credentials_stay_out_of_errors() {
    let backend = MockEndpoint::start(CannedResponse::new(500, "")).await;
    let location = format!(
        "http://root:s3cretpw@{}/api/mydb/mytable/_stream_load",
        backend.address()
    );
    let frontend = MockEndpoint::start(CannedResponse::redirect(location)).await;
    let mut loader = StreamLoader::new(config(vec![frontend.address()])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    let text = err.to_string();
    assert!(!text.contains("s3cretpw"), "{}", text);
    assert!(!format!("{:?}", err).contains("s3cretpw"));
    assert!(text.contains(&format!("http://{}/api/mydb/mytable/_stream_load", backend.address())));
    assert_eq!(backend.requests().len(), 1, "the request itself still went out");
}

#[tokio::test]
async fn test_dropped_connection_is_transport_error() {
    let (address, server) = hang_up_address().await;
    let mut loader = StreamLoader::new(config(vec![address])).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    assert!(matches!(err, LoadError::Transport(_)), "{:?}", err);

    server.abort();
}

#[tokio::test]
async fn test_load_timeout_is_transport_error() {
    let slow = CannedResponse::ok(SUCCESS).with_delay(Duration::from_secs(10));
    let node = MockEndpoint::start(slow).await;
    let config = config(vec![node.address()]).with_load_timeout(Duration::from_millis(200));
    let mut loader = StreamLoader::new(config).unwrap();

    let err = loader.load(&batch()).await.unwrap_err();
    match err {
        LoadError::Transport(e) => assert!(e.is_timeout(), "{:?}", e),
        other => panic!("expected Transport, got {:?}", other),
    }
    assert_eq!(node.requests().len(), 1);
}
