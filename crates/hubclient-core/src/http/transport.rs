//! HTTP transport capability
//!
//! The orchestrator talks to the network only through [`Transport`]. The
//! production implementation wraps reqwest; tests plug in scripted fakes.
//! Trust is a per-request parameter: [`ReqwestTransport`] keeps one client
//! per [`TrustMode`] and never reconfigures a client after construction.

use crate::error::{Error, Result};
use crate::http::error::TransportError;
use crate::http::tls::TrustMode;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Content type announced on every request
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP methods used by the app service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A single request as handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute URL without query
    pub url: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    pub trust: TrustMode,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>, query: Vec<(String, String)>, trust: TrustMode) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query,
            trust,
        }
    }

    /// POST with an empty body; parameters never travel on POST
    pub fn post(url: impl Into<String>, trust: TrustMode) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            trust,
        }
    }

    /// Value of a query parameter, if present
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response; any HTTP status is a response, not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Non-blocking HTTP capability shared by every operation
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    strict: ReqwestClient,
    permissive: ReqwestClient,
}

impl ReqwestTransport {
    /// Build both clients with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            strict: Self::build_client(timeout, TrustMode::Strict)?,
            permissive: Self::build_client(timeout, TrustMode::Permissive)?,
        })
    }

    fn build_client(timeout: Duration, trust: TrustMode) -> Result<ReqwestClient> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

        // With the rustls backend, disabling certificate verification also
        // disables the hostname check.
        ReqwestClient::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(trust == TrustMode::Permissive)
            .build()
            .map_err(|e| Error::HttpClient {
                message: format!("Failed to create {} HTTP client: {}", trust, e),
                source: Some(Box::new(e)),
            })
    }

    fn client_for(&self, trust: TrustMode) -> &ReqwestClient {
        match trust {
            TrustMode::Strict => &self.strict,
            TrustMode::Permissive => &self.permissive,
        }
    }

    fn request_url(request: &TransportRequest) -> std::result::Result<Url, TransportError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| TransportError::invalid_url(&request.url, e))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, trust = %request.trust))]
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = Self::request_url(&request)?;
        let client = self.client_for(request.trust);

        let builder = match request.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url),
        };

        let response = builder
            .send()
            .await
            .map_err(TransportError::from_request_error)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from_request_error)?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_carries_no_parameters() {
        let request = TransportRequest::post("https://h/x.aspx", TrustMode::Strict);
        assert_eq!(request.method, Method::Post);
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_request_param_lookup() {
        let request = TransportRequest::get(
            "https://h/login.jsf",
            vec![("device".to_string(), "abc".to_string())],
            TrustMode::Permissive,
        );
        assert_eq!(request.param("device"), Some("abc"));
        assert_eq!(request.param("username"), None);
    }

    #[test]
    fn test_request_url_encodes_query() {
        let request = TransportRequest::get(
            "https://h/OutSystemsAppService/login.jsf",
            vec![
                ("username".to_string(), "a b".to_string()),
                ("devicetype".to_string(), "android".to_string()),
            ],
            TrustMode::Strict,
        );
        let url = ReqwestTransport::request_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://h/OutSystemsAppService/login.jsf?username=a+b&devicetype=android"
        );
    }

    #[test]
    fn test_request_url_without_query_has_no_question_mark() {
        let request = TransportRequest::post("https://h/OutSystemsAppService/applications.aspx", TrustMode::Strict);
        let url = ReqwestTransport::request_url(&request).unwrap();
        assert!(!url.as_str().contains('?'));
    }

    #[test]
    fn test_malformed_url_is_transport_error() {
        let request = TransportRequest::post("https://not a host/x.aspx", TrustMode::Strict);
        let err = ReqwestTransport::request_url(&request).unwrap_err();
        assert_eq!(err.status_code(), 0);
    }

    #[test]
    fn test_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
