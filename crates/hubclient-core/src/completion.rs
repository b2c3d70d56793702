//! Uniform completion contract
//!
//! Every logical operation ends in exactly one [`Completion`]: either a
//! (possibly empty) successful result or a failure with a status code.
//! Callbacks receive it through [`CompletionHandler`], which is consumed on
//! delivery so it cannot fire twice.

use crate::http::error::{ErrorClassification, STATUS_NOT_SENT};
use crate::types::OperationResult;
use serde::{Deserialize, Serialize};

/// Terminal outcome of a logical operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion<T> {
    /// Decoded payload; `None` on failure, and on success when the body did not decode
    pub result: Option<T>,
    pub is_failure: bool,
    /// HTTP status, `-1` when never sent, `0` when no response was received
    pub status_code: i32,
}

impl<T> Completion<T> {
    pub fn success(result: Option<T>, status_code: i32) -> Self {
        Self {
            result,
            is_failure: false,
            status_code,
        }
    }

    pub fn failure(status_code: i32) -> Self {
        Self {
            result: None,
            is_failure: true,
            status_code,
        }
    }

    /// Rejected before dispatch
    pub fn not_sent() -> Self {
        Self::failure(STATUS_NOT_SENT)
    }

    pub fn is_success(&self) -> bool {
        !self.is_failure
    }

    /// Failure classification, `None` for successes
    pub fn classification(&self) -> Option<ErrorClassification> {
        self.is_failure
            .then(|| ErrorClassification::from_status(self.status_code))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Completion<U> {
        Completion {
            result: self.result.map(f),
            is_failure: self.is_failure,
            status_code: self.status_code,
        }
    }

    /// Erase the payload type
    pub fn into_operation_result(self) -> Completion<OperationResult>
    where
        T: Into<OperationResult>,
    {
        self.map(Into::into)
    }

    /// Hand this completion to `handler`
    pub fn deliver<H: CompletionHandler<T>>(self, handler: H) {
        handler.request_finish(self.result, self.is_failure, self.status_code);
    }
}

/// Receiver of an operation's terminal outcome
pub trait CompletionHandler<T>: Send + 'static {
    fn request_finish(self, result: Option<T>, is_failure: bool, status_code: i32);
}

impl<T, F> CompletionHandler<T> for F
where
    F: FnOnce(Option<T>, bool, i32) + Send + 'static,
{
    fn request_finish(self, result: Option<T>, is_failure: bool, status_code: i32) {
        self(result, is_failure, status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Infrastructure;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_not_sent_sentinel() {
        let completion: Completion<()> = Completion::not_sent();
        assert!(completion.is_failure);
        assert_eq!(completion.status_code, -1);
        assert_eq!(completion.classification(), Some(ErrorClassification::NotSent));
    }

    #[test]
    fn test_success_has_no_classification() {
        let completion = Completion::success(Some(1), 200);
        assert!(completion.is_success());
        assert_eq!(completion.classification(), None);
    }

    #[test]
    fn test_deliver_to_closure() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        Completion::<u8>::failure(500).deliver(move |result: Option<u8>, failed: bool, status: i32| {
            sink.lock().unwrap().push((result, failed, status));
        });

        assert_eq!(*seen.lock().unwrap(), vec![(None, true, 500)]);
    }

    #[tokio::test]
    async fn test_deliver_through_channel() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        Completion::success(Some("ok"), 200).deliver(move |result: Option<&'static str>, failed: bool, status: i32| {
            let _ = tx.send(Completion {
                result,
                is_failure: failed,
                status_code: status,
            });
        });
        assert_eq!(rx.await.unwrap(), Completion::success(Some("ok"), 200));
    }

    #[test]
    fn test_into_operation_result() {
        let completion = Completion::success(Some(Infrastructure::default()), 200);
        let erased = completion.into_operation_result();
        assert!(matches!(erased.result, Some(OperationResult::Infrastructure(_))));
        assert_eq!(erased.status_code, 200);
    }
}
