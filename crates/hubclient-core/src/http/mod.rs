//! HTTP access to the hub app service
//!
//! This module provides:
//! - Per-host certificate trust decisions
//! - URL construction under the learned dialect
//! - The transport capability and its reqwest implementation
//! - One-shot dialect retry on 404
//! - Background response decoding
//! - The request orchestrator tying these together

pub mod builder;
pub mod client;
pub mod decoder;
pub mod error;
pub mod retry;
pub mod tls;
pub mod transport;

pub use builder::UrlBuilder;
pub use client::{HubClient, HubClientConfig, Operation};
pub use decoder::{DecodeError, ResponseShape};
pub use error::{ErrorClassification, TransportError};
pub use retry::{RetryDecision, RetryHandler};
pub use tls::{TrustMode, TrustPolicy};
pub use transport::{Method, ReqwestTransport, Transport, TransportRequest, TransportResponse};
