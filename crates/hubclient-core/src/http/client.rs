//! Request orchestration for the app service
//!
//! [`HubClient`] runs every operation through the same state machine:
//!
//! 1. dispatch: build the URL under the current dialect, decide trust for
//!    the host, send through the shared [`Transport`]
//! 2. network complete: a 404 under the default dialect corrects the dialect
//!    and re-dispatches once; any other non-200 completes as a failure
//! 3. decode: 200 bodies are decoded on the blocking pool
//! 4. complete: exactly one [`Completion`] per logical operation

use crate::completion::{Completion, CompletionHandler};
use crate::error::{Error, Result};
use crate::http::builder::{UrlBuilder, SERVICE_PATH};
use crate::http::decoder::{decode_in_background, ResponseShape};
use crate::http::error::{ErrorClassification, TransportError};
use crate::http::retry::execute_with_dialect_retry;
use crate::http::tls::{TrustPolicy, DEFAULT_TRUSTED_DOMAINS};
use crate::http::transport::{
    Method, ReqwestTransport, Transport, TransportRequest, TransportResponse,
};
use crate::settings::{DialectState, SettingsStore};
use crate::types::{Application, Dialect, Infrastructure, Login};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Status of a successful app service call
const STATUS_OK: u16 = 200;

/// Configuration for the hub client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubClientConfig {
    /// URL scheme, `https` outside of tests
    pub scheme: String,
    /// Path segment of the app service on every hub
    pub service_path: String,
    /// Value sent as `devicetype`
    pub device_type: String,
    /// Domains for which certificate verification is relaxed
    pub trusted_domains: Vec<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HubClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            service_path: SERVICE_PATH.to_string(),
            device_type: "android".to_string(),
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            timeout_secs: 30,
        }
    }
}

impl HubClientConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scheme != "https" && self.scheme != "http" {
            return Err(Error::Configuration {
                message: format!("Unsupported scheme '{}', expected https or http", self.scheme),
                source: None,
            });
        }
        if self.timeout_secs == 0 {
            return Err(Error::Configuration {
                message: "Request timeout cannot be zero".to_string(),
                source: None,
            });
        }
        if self.device_type.is_empty() {
            return Err(Error::validation("device_type", "cannot be empty"));
        }
        Ok(())
    }

    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(self.scheme.clone(), self.service_path.clone())
    }

    pub fn trust_policy(&self) -> TrustPolicy {
        TrustPolicy::new(self.trusted_domains.iter().cloned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The fixed set of app service operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Infrastructure,
    Applications,
    Login,
    RegisterToken,
}

impl Operation {
    /// Path of the operation under the service path, without suffix
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Infrastructure => "infrastructure",
            Operation::Applications => "applications",
            Operation::Login => "login",
            Operation::RegisterToken => "registertoken",
        }
    }

    /// Catalog reads are POSTs with an empty body; parameterized reads are GETs
    pub fn method(&self) -> Method {
        match self {
            Operation::Infrastructure | Operation::Applications => Method::Post,
            Operation::Login | Operation::RegisterToken => Method::Get,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Client for the hub app service
///
/// Cheap to clone; clones share the transport and the learned dialect.
#[derive(Clone)]
pub struct HubClient {
    transport: Arc<dyn Transport>,
    urls: UrlBuilder,
    trust: TrustPolicy,
    dialect: DialectState,
    device_type: String,
}

impl HubClient {
    /// Create a client backed by reqwest
    pub fn new(config: HubClientConfig, settings: Arc<dyn SettingsStore>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Self::with_transport(config, settings, transport)
    }

    /// Create a client over an existing transport
    pub fn with_transport(
        config: HubClientConfig,
        settings: Arc<dyn SettingsStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            urls: config.url_builder(),
            trust: config.trust_policy(),
            dialect: DialectState::new(settings),
            device_type: config.device_type,
        })
    }

    pub fn dialect_state(&self) -> &DialectState {
        &self.dialect
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        self.dialect.store()
    }

    pub fn trust_policy(&self) -> &TrustPolicy {
        &self.trust
    }

    /// Absolute URL of `relative_path` on `host` under the current dialect
    pub fn build_url(&self, host: &str, relative_path: &str) -> String {
        self.urls.build_url(host, relative_path, self.dialect.get())
    }

    /// Absolute URL of an application image under the current dialect
    pub fn build_image_url(&self, host: &str, image_id: i64) -> String {
        self.urls.build_image_url(host, image_id, self.dialect.get())
    }

    /// URL of a hub application for a web view
    pub fn web_application_url(&self, host: &str, path: &str) -> String {
        self.urls.web_application_url(host, path)
    }

    /// Fetch the hub's infrastructure description
    #[instrument(skip(self), fields(operation = "infrastructure"))]
    pub async fn get_infrastructure(&self, hub_host: &str) -> Completion<Infrastructure> {
        let outcome = self
            .send(Operation::Infrastructure, hub_host, Vec::new())
            .await;
        self.complete_decoded(Operation::Infrastructure, outcome, ResponseShape::Infrastructure)
            .await
    }

    /// Fetch the ordered application catalog
    #[instrument(skip(self), fields(operation = "applications"))]
    pub async fn get_applications(&self, hub_host: &str) -> Completion<Vec<Application>> {
        let outcome = self
            .send(Operation::Applications, hub_host, Vec::new())
            .await;
        self.complete_decoded(Operation::Applications, outcome, ResponseShape::ApplicationList)
            .await
    }

    /// Log in on the current hub application.
    ///
    /// Missing credentials complete immediately with status `-1` and nothing
    /// is sent.
    #[instrument(skip(self, username, password, device), fields(operation = "login"))]
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        device: Option<&str>,
    ) -> Completion<Login> {
        let (Some(username), Some(password)) = (username, password) else {
            warn!("Login rejected before dispatch: missing username or password");
            return Completion::not_sent();
        };
        let Some(hub_host) = self.hosted_application() else {
            return Completion::not_sent();
        };

        let mut query = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        if let Some(device) = device {
            query.push(("device".to_string(), device.to_string()));
        }
        query.push(("devicetype".to_string(), self.device_type.clone()));

        let outcome = self.send(Operation::Login, &hub_host, query).await;
        self.complete_decoded(Operation::Login, outcome, ResponseShape::Login)
            .await
    }

    /// Register a push-notification device token on the current hub application
    #[instrument(skip(self, device), fields(operation = "registertoken"))]
    pub async fn register_token(&self, device: Option<&str>) -> Completion<()> {
        let Some(device) = device else {
            warn!("Token registration rejected before dispatch: missing device");
            return Completion::not_sent();
        };
        let Some(hub_host) = self.hosted_application() else {
            return Completion::not_sent();
        };

        let query = vec![
            ("device".to_string(), device.to_string()),
            ("devicetype".to_string(), self.device_type.clone()),
        ];

        match self.send(Operation::RegisterToken, &hub_host, query).await {
            Ok(response) if response.status == STATUS_OK => {
                info!("Device token registered");
                Completion::success(None, i32::from(STATUS_OK))
            }
            outcome => Self::complete_failed(Operation::RegisterToken, outcome),
        }
    }

    /// Run [`Self::get_infrastructure`] on the runtime and deliver to `handler`
    pub fn dispatch_infrastructure<H>(&self, hub_host: impl Into<String>, handler: H) -> JoinHandle<()>
    where
        H: CompletionHandler<Infrastructure>,
    {
        let client = self.clone();
        let hub_host = hub_host.into();
        tokio::spawn(async move {
            client.get_infrastructure(&hub_host).await.deliver(handler);
        })
    }

    /// Run [`Self::get_applications`] on the runtime and deliver to `handler`
    pub fn dispatch_applications<H>(&self, hub_host: impl Into<String>, handler: H) -> JoinHandle<()>
    where
        H: CompletionHandler<Vec<Application>>,
    {
        let client = self.clone();
        let hub_host = hub_host.into();
        tokio::spawn(async move {
            client.get_applications(&hub_host).await.deliver(handler);
        })
    }

    /// Run [`Self::login`] on the runtime and deliver to `handler`
    pub fn dispatch_login<H>(
        &self,
        username: Option<String>,
        password: Option<String>,
        device: Option<String>,
        handler: H,
    ) -> JoinHandle<()>
    where
        H: CompletionHandler<Login>,
    {
        let client = self.clone();
        tokio::spawn(async move {
            client
                .login(username.as_deref(), password.as_deref(), device.as_deref())
                .await
                .deliver(handler);
        })
    }

    /// Run [`Self::register_token`] on the runtime and deliver to `handler`
    pub fn dispatch_register_token<H>(&self, device: Option<String>, handler: H) -> JoinHandle<()>
    where
        H: CompletionHandler<()>,
    {
        let client = self.clone();
        tokio::spawn(async move {
            client.register_token(device.as_deref()).await.deliver(handler);
        })
    }

    fn hosted_application(&self) -> Option<String> {
        let host = self.settings().hub_application().filter(|h| !h.is_empty());
        if host.is_none() {
            warn!("No hub application configured, request not sent");
        }
        host
    }

    /// Dispatch `operation`, with the one-shot dialect retry
    async fn send(
        &self,
        operation: Operation,
        hub_host: &str,
        query: Vec<(String, String)>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let trust = self.trust.decide(Some(hub_host));

        let (outcome, dialect) = execute_with_dialect_retry(&self.dialect, |dialect: Dialect| {
            let url = self.urls.build_url(hub_host, operation.path(), dialect);
            let request = match operation.method() {
                Method::Get => TransportRequest::get(url, query.clone(), trust),
                Method::Post => TransportRequest::post(url, trust),
            };
            debug!(%operation, %dialect, %trust, url = %request.url, "Dispatching request");
            self.transport.execute(request)
        })
        .await;

        if let Ok(ref response) = outcome {
            debug!(%operation, %dialect, status = response.status, "Network stage complete");
        }
        outcome
    }

    async fn complete_decoded<T>(
        &self,
        operation: Operation,
        outcome: std::result::Result<TransportResponse, TransportError>,
        shape: ResponseShape,
    ) -> Completion<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match outcome {
            Ok(response) if response.status == STATUS_OK => {
                let result = decode_in_background::<T>(response.body, shape).await;
                Completion::success(result, i32::from(STATUS_OK))
            }
            outcome => Self::complete_failed(operation, outcome),
        }
    }

    fn complete_failed<T>(
        operation: Operation,
        outcome: std::result::Result<TransportResponse, TransportError>,
    ) -> Completion<T> {
        let status = match outcome {
            Ok(response) => i32::from(response.status),
            Err(error) => {
                warn!(%operation, %error, "No response from hub");
                error.status_code()
            }
        };
        warn!(
            %operation,
            status,
            classification = %ErrorClassification::from_status(status),
            "Operation failed"
        );
        Completion::failure(status)
    }
}

impl fmt::Debug for HubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubClient")
            .field("urls", &self.urls)
            .field("trust", &self.trust)
            .field("dialect", &self.dialect)
            .field("device_type", &self.device_type)
            .finish()
    }
}
