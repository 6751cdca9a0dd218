//! Error types for the schmuckliCloud SDK.

use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SDK.
///
/// Three kinds of failures surface to callers: local validation errors
/// (rejected before any network activity), backend-reported errors (the
/// backend answered with a failing HTTP status), and transport errors
/// (propagated from `reqwest` unchanged). The SDK never retries.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend answered with a failing HTTP status.
    #[error("API error: {status} {status_text} - {message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    /// A required argument was missing or malformed. Raised before any
    /// request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation requires a session token and none was set.
    #[error("Please provide an auth token before you do this request.")]
    MissingAuthToken,

    /// App credentials could not be resolved from any source.
    #[error("Credentials not found: {0}")]
    CredentialsNotFound(String),

    /// Transport failure from the underlying HTTP client.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected internal failure (client construction, envelope parsing).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// Create a local validation error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// True for errors raised before any request was sent.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MissingAuthToken | Self::CredentialsNotFound(_)
        )
    }
}
