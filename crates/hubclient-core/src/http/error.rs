//! Failure classification for hub requests
//!
//! Classifies terminal statuses and transport-level errors. The completion
//! contract only carries the raw status; the classification is what gets
//! logged and what callers can ask for when they want more.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported when an operation is rejected before dispatch
pub const STATUS_NOT_SENT: i32 = -1;

/// Status reported when the transport failed without an HTTP response
pub const STATUS_NO_RESPONSE: i32 = 0;

/// Classification of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// Rejected before reaching the network (missing credentials or host)
    NotSent,
    /// 404, the hub may expect the other URL suffix
    DialectMismatch,
    /// Other 4xx responses
    ClientError,
    /// 5xx responses
    ServerError,
    /// Connection, TLS, DNS or timeout failures
    NetworkError,
    /// Anything else (unexpected 1xx/2xx/3xx terminal statuses)
    Unknown,
}

impl ErrorClassification {
    /// Classify a terminal status as reported through the completion contract
    pub fn from_status(status: i32) -> Self {
        match status {
            STATUS_NOT_SENT => ErrorClassification::NotSent,
            STATUS_NO_RESPONSE => ErrorClassification::NetworkError,
            404 => ErrorClassification::DialectMismatch,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorClassification::NotSent => "not sent",
            ErrorClassification::DialectMismatch => "dialect mismatch",
            ErrorClassification::ClientError => "client error",
            ErrorClassification::ServerError => "server error",
            ErrorClassification::NetworkError => "network error",
            ErrorClassification::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Transport failure with no usable HTTP response
#[derive(Debug, Clone, thiserror::Error)]
#[error("Transport error ({classification}): {message}")]
pub struct TransportError {
    pub classification: ErrorClassification,
    pub message: String,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            classification: ErrorClassification::NetworkError,
            message: message.into(),
        }
    }

    pub fn invalid_url(url: &str, reason: impl fmt::Display) -> Self {
        Self {
            classification: ErrorClassification::Unknown,
            message: format!("Invalid URL '{}': {}", url, reason),
        }
    }

    /// Create from a reqwest error
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let classification = if error.is_timeout() || error.is_connect() || error.is_request() {
            ErrorClassification::NetworkError
        } else {
            ErrorClassification::Unknown
        };

        Self {
            classification,
            message: error.to_string(),
        }
    }

    /// Status this failure is reported with
    pub fn status_code(&self) -> i32 {
        STATUS_NO_RESPONSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorClassification::from_status(-1), ErrorClassification::NotSent);
        assert_eq!(ErrorClassification::from_status(0), ErrorClassification::NetworkError);
        assert_eq!(ErrorClassification::from_status(404), ErrorClassification::DialectMismatch);
        assert_eq!(ErrorClassification::from_status(401), ErrorClassification::ClientError);
        assert_eq!(ErrorClassification::from_status(503), ErrorClassification::ServerError);
        assert_eq!(ErrorClassification::from_status(302), ErrorClassification::Unknown);
    }

    #[test]
    fn test_transport_error_reports_no_response() {
        let err = TransportError::network("connection refused");
        assert_eq!(err.status_code(), STATUS_NO_RESPONSE);
        assert_eq!(
            err.to_string(),
            "Transport error (network error): connection refused"
        );
    }

    #[test]
    fn test_invalid_url_message() {
        let err = TransportError::invalid_url("https://not a host/x", "invalid domain character");
        assert!(err.message.contains("not a host"));
        assert_eq!(err.classification, ErrorClassification::Unknown);
    }
}
