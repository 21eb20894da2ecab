/*
[INPUT]:  Error sources (transport, HTTP status, validation, serialization)
[OUTPUT]: Structured error type surfaced to every caller of the client
[POS]:    Error handling layer - unified error type for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the futures adapter
#[derive(Error, Debug)]
pub enum FuturesError {
    /// Transport failure or non-2xx response. Never retried by the client.
    #[error("Request failed{}: {message}", describe_status(.status))]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// Order or query rejected locally, before any network call
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Response body was not the expected JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Client could not be built from the given settings
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_status(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

impl FuturesError {
    /// Create a request failure from an HTTP status and response body
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        FuturesError::RequestFailed {
            status: Some(status.as_u16()),
            message: body.into(),
        }
    }

    /// Create a request failure for a transport error (DNS, refused, timeout)
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection error: {err}")
        } else {
            err.to_string()
        };
        FuturesError::RequestFailed {
            status: None,
            message,
        }
    }

    /// HTTP status of a failed request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FuturesError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if the error was raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, FuturesError::Validation(_))
    }

    /// Check if the error came from the exchange round trip
    pub fn is_request_failure(&self) -> bool {
        matches!(self, FuturesError::RequestFailed { .. })
    }
}

/// Result type alias for futures adapter operations
pub type Result<T> = std::result::Result<T, FuturesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error() {
        let err = FuturesError::http_status(StatusCode::BAD_REQUEST, r#"{"code":-1102}"#);
        assert!(err.is_request_failure());
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            r#"Request failed (HTTP 400): {"code":-1102}"#
        );
    }

    #[test]
    fn test_request_failed_without_status() {
        let err = FuturesError::RequestFailed {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn test_validation_error() {
        let err = FuturesError::Validation("limit orders require a price".to_string());
        assert!(err.is_validation());
        assert!(!err.is_request_failure());
        assert_eq!(err.status(), None);
    }
}
