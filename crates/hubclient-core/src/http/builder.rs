//! URL construction for app service endpoints
//!
//! Composes `{scheme}://{host}/{service_path}/{operation}{suffix}` where the
//! suffix comes from the current [`Dialect`]. Nothing is validated here: a
//! malformed host yields a malformed URL and the transport reports it.

use crate::types::Dialect;
use serde::{Deserialize, Serialize};

/// Default service path segment on every hub
pub const SERVICE_PATH: &str = "OutSystemsAppService";

/// Endpoint that serves application icons
pub const IMAGE_ENDPOINT: &str = "applicationImage";

/// Builder for absolute app service URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlBuilder {
    scheme: String,
    service_path: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new("https", SERVICE_PATH)
    }
}

impl UrlBuilder {
    pub fn new(scheme: impl Into<String>, service_path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            service_path: service_path.into().trim_matches('/').to_string(),
        }
    }

    /// Base URL of the app service on `host`, with a trailing slash
    pub fn base_url(&self, host: &str) -> String {
        format!("{}://{}/{}/", self.scheme, host, self.service_path)
    }

    /// Absolute URL for an operation under `dialect`
    pub fn build_url(&self, host: &str, relative_path: &str, dialect: Dialect) -> String {
        format!("{}{}{}", self.base_url(host), relative_path, dialect.suffix())
    }

    /// Absolute URL of an application's image
    pub fn build_image_url(&self, host: &str, image_id: i64, dialect: Dialect) -> String {
        format!(
            "{}?id={}",
            self.build_url(host, IMAGE_ENDPOINT, dialect),
            image_id
        )
    }

    /// URL of a hub application itself, as opened in a web view
    pub fn web_application_url(&self, host: &str, path: &str) -> String {
        format!("{}://{}/{}", self.scheme, host, path.trim_start_matches('/'))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_jsf() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.build_url("tenant.outsystems.net", "login", Dialect::Jsf),
            "https://tenant.outsystems.net/OutSystemsAppService/login.jsf"
        );
    }

    #[test]
    fn test_build_url_aspx() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.build_url("tenant.outsystems.net", "infrastructure", Dialect::Aspx),
            "https://tenant.outsystems.net/OutSystemsAppService/infrastructure.aspx"
        );
    }

    #[test]
    fn test_build_image_url() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.build_image_url("hub.example.com", 42, Dialect::Aspx),
            "https://hub.example.com/OutSystemsAppService/applicationImage.aspx?id=42"
        );
    }

    #[test]
    fn test_web_application_url() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.web_application_url("hub.example.com", "/Directory"),
            "https://hub.example.com/Directory"
        );
    }

    #[test]
    fn test_malformed_host_is_passed_through() {
        let builder = UrlBuilder::default();
        let url = builder.build_url("not a host", "login", Dialect::Jsf);
        assert_eq!(url, "https://not a host/OutSystemsAppService/login.jsf");
    }

    #[test]
    fn test_custom_scheme_and_path() {
        let builder = UrlBuilder::new("http", "/AppService/");
        assert_eq!(
            builder.build_url("127.0.0.1:8080", "applications", Dialect::Jsf),
            "http://127.0.0.1:8080/AppService/applications.jsf"
        );
    }
}
