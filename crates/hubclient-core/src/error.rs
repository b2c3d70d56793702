//! Error types for the hubclient core library
//!
//! Errors here never cross the completion contract: every logical operation
//! ends in a [`Completion`](crate::Completion). These types cover the places
//! where the library is used directly (client construction, settings
//! persistence, decoding) and carry context for logging.

use thiserror::Error;

/// Main error type for hubclient operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid client config, unusable TLS setup)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    HttpClient {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Settings store read/write errors
    #[error("Settings error: {message}")]
    Settings {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Input validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a settings error with a message and an optional cause
    pub fn settings(message: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Error::Settings {
            message: message.into(),
            source,
        }
    }

    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
