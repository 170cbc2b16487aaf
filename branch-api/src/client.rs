//! HTTP client for the Branch REST API.
//!
//! Owns the shared connection pool and the credentials, builds requests
//! (URL, query string, headers, JSON body), and turns responses into raw
//! bytes or a `BranchError`.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request, StatusCode, Url};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use branch_core::config::{AppConfig, BranchConfig};
use branch_core::error::{BranchError, BranchResult};

use crate::response::error_from_body;

/// HTTP client for the Branch deep-link API.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can serve any number of concurrent callers.
#[derive(Clone)]
pub struct BranchClient {
    inner: Client,
    /// Base URL for the API (e.g. "https://api2.branch.io/v1").
    api_url: String,
    /// Access key attached to every call.
    branch_key: String,
    /// Access secret attached to update calls.
    branch_secret: String,
}

impl BranchClient {
    /// Create a client for the production API with the given credentials.
    pub fn new(branch_key: &str, branch_secret: &str) -> BranchResult<Self> {
        Self::from_config(&BranchConfig::new(branch_key, branch_secret))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &BranchConfig) -> BranchResult<Self> {
        let api_url = AppConfig::sanitize_api_url(&config.api_url)?;
        Url::parse(&api_url)
            .map_err(|e| BranchError::Config(format!("invalid api_url {api_url}: {e}")))?;

        let inner = Client::builder()
            .build()
            .map_err(|e| BranchError::Build(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            api_url,
            branch_key: config.branch_key.clone(),
            branch_secret: config.branch_secret.clone(),
        })
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn branch_key(&self) -> &str {
        &self.branch_key
    }

    pub(crate) fn branch_secret(&self) -> &str {
        &self.branch_secret
    }

    /// Build the full URL for an API path, with an optional query string.
    ///
    /// Query keys are emitted in sorted order. String values are sent as-is;
    /// any other value is sent in its JSON text form.
    pub fn build_url(&self, path: &str, query: Option<&Map<String, Value>>) -> BranchResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| BranchError::Build(format!("failed to parse api url: {e}")))?;

        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);

        if let Some(query) = query {
            let mut pairs: Vec<(&String, String)> =
                query.iter().map(|(k, v)| (k, query_value(v))).collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));

            url.set_query(None);
            if !pairs.is_empty() {
                let mut serializer = url.query_pairs_mut();
                for (k, v) in pairs {
                    serializer.append_pair(k, &v);
                }
            }
        }

        Ok(url)
    }

    /// Build a request without sending it.
    ///
    /// Every request carries `Content-Type: application/json`. POST and PUT
    /// carry `body` serialized as JSON (`null` when absent); any other method
    /// never carries a body.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Map<String, Value>>,
    ) -> BranchResult<Request> {
        let url = self.build_url(path, query)?;

        let mut builder = self
            .inner
            .request(method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if method == Method::POST || method == Method::PUT {
            let payload = serde_json::to_vec(&body)
                .map_err(|e| BranchError::Build(format!("failed to encode body: {e}")))?;
            builder = builder.body(payload);
        }

        builder
            .build()
            .map_err(|e| BranchError::Build(e.to_string()))
    }

    /// Send a request and return the body of a 200 response.
    ///
    /// Returns `Cancelled` as soon as `cancel` fires; the in-flight exchange is
    /// dropped along with its connection.
    pub async fn send_request(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Map<String, Value>>,
    ) -> BranchResult<Vec<u8>> {
        let request = self.build_request(method, path, query, body)?;
        debug!("{} {}", request.method(), path);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("request to {path} cancelled");
                Err(BranchError::Cancelled)
            }
            result = self.execute(request) => result,
        }
    }

    async fn execute(&self, request: Request) -> BranchResult<Vec<u8>> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(classify_error)?;
        let status = response.status();

        // Consumes the response; the connection goes back to the pool or is
        // closed whether or not the read succeeds.
        let body = response
            .bytes()
            .await
            .map_err(|e| BranchError::ReadBody(e.to_string()))?;

        if status != StatusCode::OK {
            warn!("{} {} returned {}", method, path, status.as_u16());
            return Err(error_from_body(status.as_u16(), &body));
        }

        Ok(body.to_vec())
    }

    // --- Public HTTP methods ---

    /// Execute a POST request with a JSON body.
    pub async fn post(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Map<String, Value>,
    ) -> BranchResult<Vec<u8>> {
        self.send_request(cancel, Method::POST, path, None, Some(body))
            .await
    }

    /// Execute a GET request with a query string.
    pub async fn get(
        &self,
        cancel: &CancellationToken,
        path: &str,
        query: &Map<String, Value>,
    ) -> BranchResult<Vec<u8>> {
        self.send_request(cancel, Method::GET, path, Some(query), None)
            .await
    }

    /// Execute a PUT request with a JSON body and a query string.
    pub async fn put(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Map<String, Value>,
        query: &Map<String, Value>,
    ) -> BranchResult<Vec<u8>> {
        self.send_request(cancel, Method::PUT, path, Some(query), Some(body))
            .await
    }
}

impl std::fmt::Debug for BranchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchClient")
            .field("api_url", &self.api_url)
            .field("branch_key", &self.branch_key)
            .field("branch_secret", &"<redacted>")
            .finish()
    }
}

/// Text form of a query value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classify a reqwest error into a BranchError variant.
fn classify_error(e: reqwest::Error) -> BranchError {
    if e.is_connect() {
        BranchError::Http(format!("connection failed: {e}"))
    } else if e.is_builder() {
        BranchError::Build(e.to_string())
    } else {
        BranchError::Http(e.to_string())
    }
}
