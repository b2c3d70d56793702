//! Core data types for hub application access
//!
//! This module contains the payloads returned by the app service endpoints
//! and the protocol dialect learned at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-suffix convention expected by the hub's application server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Java application server, `.jsf` pages
    Jsf,
    /// .NET application server, `.aspx` pages
    #[default]
    Aspx,
}

impl Dialect {
    /// Suffix appended to every service path under this dialect
    pub fn suffix(&self) -> &'static str {
        match self {
            Dialect::Jsf => ".jsf",
            Dialect::Aspx => ".aspx",
        }
    }

    /// The dialect a 404 under `self` points to, if any.
    ///
    /// Correction is one-directional: only the default dialect can be
    /// corrected, a 404 under `Jsf` is a genuine failure.
    pub fn corrected(&self) -> Option<Dialect> {
        match self {
            Dialect::Aspx => Some(Dialect::Jsf),
            Dialect::Jsf => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Jsf => write!(f, "jsf"),
            Dialect::Aspx => write!(f, "aspx"),
        }
    }
}

/// Hub infrastructure description returned by the `infrastructure` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Infrastructure {
    /// Display name of the hub environment
    #[serde(alias = "Name")]
    pub name: Option<String>,

    /// Platform version reported by the hub
    #[serde(alias = "Version")]
    pub version: Option<String>,
}

/// A hub application the logged-in user can open
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "Name")]
    pub name: String,

    #[serde(alias = "Description")]
    pub description: Option<String>,

    /// Identifier for the `applicationImage` endpoint
    #[serde(alias = "ImageId")]
    pub image_id: i64,

    /// Path of the application relative to the hub host
    #[serde(alias = "Path")]
    pub path: String,
}

/// Result of the `login` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Login {
    #[serde(alias = "Success")]
    pub success: bool,

    #[serde(alias = "ErrorMessage")]
    pub error_message: Option<String>,

    #[serde(alias = "Applications")]
    pub applications: Vec<Application>,
}

/// Any decoded payload an operation can produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum OperationResult {
    Infrastructure(Infrastructure),
    Login(Login),
    Applications(Vec<Application>),
    /// Operations with no payload (token registration)
    Unit,
}

impl From<Infrastructure> for OperationResult {
    fn from(value: Infrastructure) -> Self {
        OperationResult::Infrastructure(value)
    }
}

impl From<Login> for OperationResult {
    fn from(value: Login) -> Self {
        OperationResult::Login(value)
    }
}

impl From<Vec<Application>> for OperationResult {
    fn from(value: Vec<Application>) -> Self {
        OperationResult::Applications(value)
    }
}

impl From<()> for OperationResult {
    fn from(_: ()) -> Self {
        OperationResult::Unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dialect_suffix() {
        assert_eq!(Dialect::Jsf.suffix(), ".jsf");
        assert_eq!(Dialect::Aspx.suffix(), ".aspx");
        assert_eq!(Dialect::default(), Dialect::Aspx);
    }

    #[test]
    fn test_dialect_correction_is_one_way() {
        assert_eq!(Dialect::Aspx.corrected(), Some(Dialect::Jsf));
        assert_eq!(Dialect::Jsf.corrected(), None);
    }

    #[test]
    fn test_application_lenient_fields() {
        let app: Application = serde_json::from_value(json!({
            "Name": "Directory",
            "imageId": 7,
            "path": "Directory",
            "unknownField": true
        }))
        .unwrap();

        assert_eq!(app.name, "Directory");
        assert_eq!(app.image_id, 7);
        assert_eq!(app.description, None);
    }

    #[test]
    fn test_login_defaults_when_fields_missing() {
        let login: Login = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(login.success);
        assert!(login.applications.is_empty());
        assert!(login.error_message.is_none());
    }

    #[test]
    fn test_operation_result_from_payloads() {
        assert_eq!(OperationResult::from(()), OperationResult::Unit);
        assert!(matches!(
            OperationResult::from(vec![Application::default()]),
            OperationResult::Applications(ref apps) if apps.len() == 1
        ));
    }
}
