//! Response types.
//!
//! The deep-link endpoint answers a successful create with `{"url": "..."}`
//! and reads/updates with the link's full JSON description. Failures carry
//! a `{message, code}` error body, sometimes wrapped in an `error` object.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use branch_core::error::{BranchError, BranchResult};

/// Body of a successful link creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlResponse {
    /// The generated deep link.
    #[serde(rename = "url", alias = "Url")]
    pub url: String,
}

/// Error detail returned by the provider on a non-200 status.
///
/// Missing fields read as empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub message: String,
    pub code: i64,
}

impl ErrorBody {
    /// Parse an error body, accepting both the flat and the wrapped form.
    ///
    /// Any JSON object is accepted; anything else is an error.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut value: Value = serde_json::from_slice(body)?;
        if matches!(value.get("error"), Some(Value::Object(_))) {
            value = value["error"].take();
        }
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {value}"
            )));
        }
        serde_json::from_value(value)
    }
}

/// Turn a non-200 response into the matching error.
pub fn error_from_body(status: u16, body: &[u8]) -> BranchError {
    match ErrorBody::parse(body) {
        Ok(err) => BranchError::ServerError {
            status,
            code: err.code,
            message: err.message,
        },
        Err(e) => BranchError::ErrorBody {
            status,
            reason: e.to_string(),
        },
    }
}

/// Parse the body of a successful create call.
pub fn parse_url(body: &[u8]) -> BranchResult<String> {
    let resp: UrlResponse = serde_json::from_slice(body)?;
    Ok(resp.url)
}

/// Re-indent a JSON body with tabs, keeping its key order and the
/// original text of every number.
pub fn pretty_json(body: &[u8]) -> BranchResult<String> {
    let value: Value = serde_json::from_slice(body)?;

    let mut out = Vec::with_capacity(body.len() * 2);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;

    String::from_utf8(out).map_err(|e| BranchError::Serialization(e.to_string()))
}
