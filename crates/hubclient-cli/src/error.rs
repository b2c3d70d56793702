//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from hubclient-core library
    #[error("Core error: {0}")]
    Core(#[from] hubclient_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No hub application is attached and none was given
    #[error("No hub application attached. Run 'hubclient infrastructure <HOST>' or pass --host")]
    NoHubApplication,

    /// The operation completed as a failure
    #[error("{operation} failed ({classification}, status {status_code})")]
    OperationFailed {
        operation: String,
        classification: String,
        status_code: i32,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::NoHubApplication => 6,
            Self::OperationFailed { status_code, .. } => match status_code {
                -1 => 7,
                0 => 10,
                _ => 8,
            },
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::NoHubApplication)
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failure_exit_codes() {
        let failed = |status_code| Error::OperationFailed {
            operation: "login".to_string(),
            classification: "test".to_string(),
            status_code,
        };
        assert_eq!(failed(-1).exit_code(), 7);
        assert_eq!(failed(0).exit_code(), 10);
        assert_eq!(failed(500).exit_code(), 8);
    }

    #[test]
    fn test_format_error_without_color() {
        let formatted = format_error(&Error::config("bad scheme"), false);
        assert_eq!(formatted, "Error: Configuration error: bad scheme");
    }

    #[test]
    fn test_help_hint_only_for_missing_host() {
        assert!(Error::NoHubApplication.should_show_help());
        assert!(!Error::other("x").should_show_help());
    }
}
