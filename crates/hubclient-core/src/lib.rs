//! Hubclient Core - web-service access layer for hub applications
//!
//! This crate talks to the app service exposed by every hub application
//! (tenant). Beyond the HTTP calls themselves it owns three policies:
//!
//! - **Trust**: requests to the operator's own domains relax certificate
//!   verification, decided per request from the destination host
//! - **Dialect**: hubs answer on `.jsf` or `.aspx` paths depending on their
//!   application server; a 404 corrects the learned dialect once and the
//!   request is retried transparently
//! - **Completion**: network, then background decode, then exactly one
//!   [`Completion`] per logical operation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hubclient_core::{HubClient, HubClientConfig, MemorySettings};
//!
//! # async fn example() -> hubclient_core::Result<()> {
//! let client = HubClient::new(HubClientConfig::default(), Arc::new(MemorySettings::new()))?;
//! let completion = client.get_infrastructure("tenant.outsystems.net").await;
//! if completion.is_success() {
//!     println!("{:?}", completion.result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod error;
pub mod http;
pub mod settings;
pub mod types;

pub use completion::{Completion, CompletionHandler};
pub use error::{Error, Result};
pub use http::{
    ErrorClassification, HubClient, HubClientConfig, Operation, TrustMode, TrustPolicy,
    UrlBuilder,
};
pub use settings::{DialectState, MemorySettings, SettingsStore};
pub use types::{Application, Dialect, Infrastructure, Login, OperationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
