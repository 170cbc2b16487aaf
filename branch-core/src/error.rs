//! Error types for the Branch deep-link client.
//!
//! Every failure a link operation can hit is a `BranchError` variant, and the
//! variant's message names the stage that failed (build, request, read, parse).

use thiserror::Error;

/// Convenience type alias for Results using BranchError.
pub type BranchResult<T> = Result<T, BranchError>;

/// Unified error type for the Branch client.
#[derive(Error, Debug)]
pub enum BranchError {
    // -- Configuration errors --
    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Request building --
    /// The outbound request could not be constructed.
    #[error("failed to build request: {0}")]
    Build(String),

    // -- Transport errors --
    /// The HTTP exchange itself failed (connection, protocol).
    #[error("error sending request: {0}")]
    Http(String),

    /// The caller's cancellation token fired before a response was produced.
    #[error("request cancelled")]
    Cancelled,

    /// The provider answered with a non-200 status and a readable error body.
    #[error("server error (status {status}, code {code}): {message}")]
    ServerError {
        /// HTTP status code of the response.
        status: u16,
        /// Numeric code from the provider's error body.
        code: i64,
        /// Message from the provider's error body.
        message: String,
    },

    // -- Response decoding --
    /// The response body could not be read off the wire.
    #[error("error reading response body: {0}")]
    ReadBody(String),

    /// A non-200 response carried a body that is not a provider error.
    #[error("could not parse error body (status {status}): {reason}")]
    ErrorBody {
        /// HTTP status code of the response.
        status: u16,
        /// Why the body was rejected.
        reason: String,
    },

    /// A success body was not JSON, or not in the expected shape.
    #[error("error parsing response body: {0}")]
    Serialization(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BranchError {
    /// HTTP status attached to this error, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BranchError::ServerError { status, .. } | BranchError::ErrorBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether the call was abandoned through its cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BranchError::Cancelled)
    }
}

impl From<serde_json::Error> for BranchError {
    fn from(e: serde_json::Error) -> Self {
        BranchError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for BranchError {
    fn from(e: toml::de::Error) -> Self {
        BranchError::Config(e.to_string())
    }
}
