//! Dialect retry for hub requests
//!
//! A 404 from a hub usually means the request used the wrong URL suffix for
//! its application server. The first such 404 under the default dialect
//! corrects the shared [`DialectState`] and re-dispatches the same logical
//! operation once. Nothing else is retried.

use crate::http::error::TransportError;
use crate::http::transport::TransportResponse;
use crate::settings::DialectState;
use crate::types::Dialect;
use std::future::Future;
use tracing::{info, warn};

/// Status that signals a dialect mismatch
pub const DIALECT_MISMATCH_STATUS: u16 = 404;

/// Maximum number of corrective retries per logical operation
pub const MAX_DIALECT_RETRIES: u32 = 1;

/// Decision after a network attempt completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-dispatch the same operation under this dialect
    Retry { dialect: Dialect },
    /// Hand the outcome to the completion stage
    NoRetry,
}

/// Per-operation retry bookkeeping
#[derive(Debug)]
pub struct RetryHandler {
    state: DialectState,
    retries: u32,
}

impl RetryHandler {
    pub fn new(state: DialectState) -> Self {
        Self { state, retries: 0 }
    }

    /// Decide whether the outcome of an attempt sent under `sent_with` warrants a retry
    pub fn should_retry(
        &mut self,
        outcome: &Result<TransportResponse, TransportError>,
        sent_with: Dialect,
    ) -> RetryDecision {
        if self.retries >= MAX_DIALECT_RETRIES {
            return RetryDecision::NoRetry;
        }

        match outcome {
            Ok(response) if response.status == DIALECT_MISMATCH_STATUS => {
                match self.state.correct(sent_with) {
                    Some(dialect) => {
                        self.retries += 1;
                        RetryDecision::Retry { dialect }
                    }
                    None => RetryDecision::NoRetry,
                }
            }
            _ => RetryDecision::NoRetry,
        }
    }

    /// Dialect the next attempt should use
    pub fn current_dialect(&self) -> Dialect {
        self.state.get()
    }

    /// Number of corrective retries made so far
    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Run `attempt` with the current dialect, retrying once on a correctable 404.
///
/// `attempt` receives the dialect to build its URL with. Returns the last
/// outcome together with the dialect it was obtained under.
pub async fn execute_with_dialect_retry<F, Fut>(
    state: &DialectState,
    mut attempt: F,
) -> (Result<TransportResponse, TransportError>, Dialect)
where
    F: FnMut(Dialect) -> Fut,
    Fut: Future<Output = Result<TransportResponse, TransportError>>,
{
    let mut handler = RetryHandler::new(state.clone());
    let mut dialect = handler.current_dialect();

    loop {
        let outcome = attempt(dialect).await;

        match handler.should_retry(&outcome, dialect) {
            RetryDecision::Retry { dialect: next } => {
                info!(
                    from = %dialect,
                    to = %next,
                    "Hub answered 404, retrying with the other application server dialect"
                );
                dialect = next;
            }
            RetryDecision::NoRetry => {
                if let Err(ref error) = outcome {
                    warn!(retries = handler.retries(), %error, "Request failed at transport level");
                }
                return (outcome, dialect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use std::sync::Arc;

    fn state(dialect: Dialect) -> DialectState {
        DialectState::new(Arc::new(MemorySettings::new().with_dialect(dialect)))
    }

    #[test]
    fn test_404_under_default_dialect_retries() {
        let mut handler = RetryHandler::new(state(Dialect::Aspx));
        let outcome = Ok(TransportResponse::new(404, ""));

        assert_eq!(
            handler.should_retry(&outcome, Dialect::Aspx),
            RetryDecision::Retry { dialect: Dialect::Jsf }
        );
        assert_eq!(handler.retries(), 1);
        assert_eq!(handler.current_dialect(), Dialect::Jsf);
    }

    #[test]
    fn test_second_404_does_not_retry() {
        let mut handler = RetryHandler::new(state(Dialect::Aspx));
        let outcome = Ok(TransportResponse::new(404, ""));

        handler.should_retry(&outcome, Dialect::Aspx);
        assert_eq!(handler.should_retry(&outcome, Dialect::Jsf), RetryDecision::NoRetry);
    }

    #[test]
    fn test_404_under_corrected_dialect_does_not_retry() {
        let mut handler = RetryHandler::new(state(Dialect::Jsf));
        let outcome = Ok(TransportResponse::new(404, ""));
        assert_eq!(handler.should_retry(&outcome, Dialect::Jsf), RetryDecision::NoRetry);
    }

    #[test]
    fn test_other_failures_do_not_retry() {
        let mut handler = RetryHandler::new(state(Dialect::Aspx));

        let server_error = Ok(TransportResponse::new(500, ""));
        assert_eq!(handler.should_retry(&server_error, Dialect::Aspx), RetryDecision::NoRetry);

        let network = Err(TransportError::network("refused"));
        assert_eq!(handler.should_retry(&network, Dialect::Aspx), RetryDecision::NoRetry);

        assert_eq!(handler.current_dialect(), Dialect::Aspx);
    }

    #[tokio::test]
    async fn test_execute_with_dialect_retry_switches_suffix() {
        let state = state(Dialect::Aspx);
        let mut seen = Vec::new();

        let (outcome, dialect) = execute_with_dialect_retry(&state, |d| {
            seen.push(d);
            async move {
                match d {
                    Dialect::Aspx => Ok(TransportResponse::new(404, "")),
                    Dialect::Jsf => Ok(TransportResponse::new(200, "{}")),
                }
            }
        })
        .await;

        assert_eq!(seen, vec![Dialect::Aspx, Dialect::Jsf]);
        assert_eq!(outcome.unwrap().status, 200);
        assert_eq!(dialect, Dialect::Jsf);
        assert_eq!(state.get(), Dialect::Jsf);
    }

    #[tokio::test]
    async fn test_execute_with_dialect_retry_gives_up_after_one_retry() {
        let state = state(Dialect::Aspx);
        let mut attempts = 0;

        let (outcome, _) = execute_with_dialect_retry(&state, |_| {
            attempts += 1;
            async { Ok(TransportResponse::new(404, "")) }
        })
        .await;

        assert_eq!(attempts, 2);
        assert_eq!(outcome.unwrap().status, 404);
    }
}
