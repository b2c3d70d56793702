//! Response decoding
//!
//! Decoding is the second asynchronous stage of every operation: the raw
//! body is moved to the blocking pool and decoded there, so the task that
//! completed the network call is never held up by JSON parsing.
//!
//! A body that cannot be decoded is logged and becomes a `None` result. The
//! operation still completes as a success; see [`decode_in_background`].

use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised while decoding a response body
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not valid UTF-8
    #[error("Response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Body is not the expected JSON shape
    #[error("Response body does not match {shape:?}: {source}")]
    Json {
        shape: ResponseShape,
        #[source]
        source: serde_json::Error,
    },
}

/// Payload shape expected from each decoding endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Single `Infrastructure` object
    Infrastructure,
    /// Single `Login` object
    Login,
    /// Ordered list of `Application`
    ApplicationList,
}

/// Decode a UTF-8 JSON body into `T`
pub fn decode_json<T: DeserializeOwned>(body: &[u8], shape: ResponseShape) -> Result<T, DecodeError> {
    let text = std::str::from_utf8(body)?;
    serde_json::from_str(text).map_err(|source| DecodeError::Json { shape, source })
}

/// Decode `body` on the blocking pool.
///
/// Returns `None` when the body does not decode. Callers deliver an
/// undecodable 200 as a successful completion with no payload.
pub async fn decode_in_background<T>(body: Bytes, shape: ResponseShape) -> Option<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let bytes = body.len();
    let joined = tokio::task::spawn_blocking(move || decode_json::<T>(&body, shape)).await;

    match joined {
        Ok(Ok(value)) => {
            debug!(?shape, bytes, "Response decoded");
            Some(value)
        }
        Ok(Err(e)) => {
            warn!(?shape, bytes, error = %e, "Failed to decode response, completing without payload");
            None
        }
        Err(e) => {
            error!(?shape, error = %e, "Decode task did not complete");
            None
        }
    }
}
