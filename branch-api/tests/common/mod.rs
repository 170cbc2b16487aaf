//! Shared test utilities for integration tests.
//!
//! `MockBranch` is an in-process stand-in for the Branch API: it serves
//! `/v1/url` on a random local port, answers every request with a fixed
//! status and body, and records what it received.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

use branch_api::BranchClient;
use branch_core::config::BranchConfig;

pub const TEST_KEY: &str = "key_test_abc123";
pub const TEST_SECRET: &str = "secret_test_xyz789";

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// The request body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running mock server.
pub struct MockBranch {
    pub api_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBranch {
    /// Start a server answering every request with `status` and `body`.
    pub async fn start(status: u16, body: &str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    /// Like `start`, but each response is held back for `delay`.
    pub async fn start_with_delay(status: u16, body: &str, delay: Duration) -> Self {
        branch_core::logging::init_console_logging("branch_api=debug");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).expect("invalid status code"),
            body: body.to_string(),
            delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/url", any(record))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            api_url: format!("http://{addr}/v1"),
            requests,
        }
    }

    /// A client pointed at this server.
    pub fn client(&self) -> BranchClient {
        let mut config = BranchConfig::new(TEST_KEY, TEST_SECRET);
        config.api_url = self.api_url.clone();
        BranchClient::from_config(&config).expect("failed to build client")
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// The only request received so far.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().expect("no request recorded")
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().expect("request log poisoned").push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query,
        content_type,
        body: body.to_vec(),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
        .into_response()
}

/// A client pointed at a local port nothing listens on.
pub async fn unreachable_client() -> BranchClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("probe listener has no address");
    drop(listener);

    let mut config = BranchConfig::new(TEST_KEY, TEST_SECRET);
    config.api_url = format!("http://{addr}/v1");
    BranchClient::from_config(&config).expect("failed to build client")
}

/// Unwrap a JSON object literal into a map.
pub fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
