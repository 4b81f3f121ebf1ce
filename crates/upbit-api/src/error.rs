//! Error types for the Upbit API client.

use std::fmt;

/// Result type alias for Upbit API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Upbit API client.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed
    Http(reqwest::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// API returned an error response
    Api(ApiError),
    /// Rate limit exceeded
    RateLimited {
        /// Retry after this many milliseconds (if provided)
        retry_after_ms: Option<u64>,
    },
    /// Invalid parameter provided
    InvalidParameter(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Api(e) => write!(f, "API error: {e}"),
            Error::RateLimited { retry_after_ms } => {
                if let Some(ms) = retry_after_ms {
                    write!(f, "Rate limited, retry after {ms}ms")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// API error returned by Upbit endpoints.
///
/// Upbit wraps errors as `{"error": {"name": ..., "message": ...}}` where
/// `name` may be a string or a numeric code depending on the endpoint.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: u16,
    /// Error name or numeric code from the body
    pub name: String,
    /// Error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.status, self.name, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            message: message.into(),
        }
    }

    /// Check if this is a malformed-request error.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }

    /// Check if the request itself was rejected rather than throttled.
    /// These are not retryable; the caller sent something Upbit refuses.
    pub fn is_fatal(&self) -> bool {
        self.is_bad_request() || self.is_auth_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_statuses() {
        assert!(ApiError::new(400, "invalid_query_payload", "bad to").is_fatal());
        assert!(ApiError::new(401, "no_authorization_token", "auth").is_fatal());
        assert!(!ApiError::new(500, "server_error", "oops").is_fatal());
    }
}
