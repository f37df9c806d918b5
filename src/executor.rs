//! Bounded-retry request executor: drives one pending call to at most one
//! terminal outcome.
//!
//! Transport failures are retried up to the policy ceiling with a fixed
//! delay. Server-returned errors are terminal on first sight and never
//! retried. A cancelled call never resolves its observable at all.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::call::{CallSpec, CancelHandle, PendingCall};
use crate::config::RetryPolicy;
use crate::response::{ErrorBody, ServiceResponse};
use crate::transport::{RawResponse, Transport};

/// Fixed message posted when a success body fails to deserialize.
pub const DESERIALIZE_ERROR_MESSAGE: &str = "failed to deserialize response";

/// One-shot observable for the terminal outcome of a logical request.
pub struct ResponseHandle<T> {
    rx: oneshot::Receiver<ServiceResponse<T>>,
}

impl<T> ResponseHandle<T> {
    /// Waits for the terminal outcome. `None` exactly when the call was
    /// cancelled before one was posted.
    pub async fn outcome(self) -> Option<ServiceResponse<T>> {
        self.rx.await.ok()
    }
}

/// Execution states of one logical request.
#[derive(Debug)]
enum State<T> {
    Pending,
    Retrying(u32),
    Succeeded(ServiceResponse<T>),
    Failed(ServiceResponse<T>),
    Cancelled,
}

/// Issues the call asynchronously and returns its observable immediately.
/// The caller only ever observes a populated result container, never an
/// error propagated out of this function.
pub fn execute_call<T>(
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    call: PendingCall<T>,
) -> ResponseHandle<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let (spec, cancel) = call.into_parts();

    tokio::spawn(async move {
        if let Some(outcome) = drive(transport.as_ref(), policy, &spec, &cancel).await {
            // The receiver may have been dropped; nothing left to do then.
            let _ = tx.send(outcome);
        }
        // None means cancelled: the sender drops without a terminal write.
    });

    ResponseHandle { rx }
}

/// Loop-based retry state machine over one call spec.
async fn drive<T>(
    transport: &dyn Transport,
    policy: RetryPolicy,
    spec: &CallSpec,
    cancel: &CancelHandle,
) -> Option<ServiceResponse<T>>
where
    T: DeserializeOwned,
{
    let mut retries = 0u32;
    let mut state = State::Pending;

    loop {
        state = match state {
            State::Pending => attempt::<T>(transport, policy, spec, cancel, &mut retries).await,
            State::Retrying(n) => {
                debug!("call {}: re-issuing after retry {}", spec.id, n);
                attempt::<T>(transport, policy, spec, cancel, &mut retries).await
            }
            State::Succeeded(outcome) | State::Failed(outcome) => return Some(outcome),
            State::Cancelled => {
                debug!("call {}: cancelled, no terminal outcome", spec.id);
                return None;
            }
        };
    }
}

/// One attempt of the call: issue it, then decide the next state.
async fn attempt<T>(
    transport: &dyn Transport,
    policy: RetryPolicy,
    spec: &CallSpec,
    cancel: &CancelHandle,
    retries: &mut u32,
) -> State<T>
where
    T: DeserializeOwned,
{
    match transport.send(spec).await {
        // A response that races with cancellation is still classified and
        // posted; only the failure path checks the cancel flag.
        Ok(response) => {
            let outcome = classify::<T>(spec.id, response);
            if outcome.is_success() {
                State::Succeeded(outcome)
            } else {
                State::Failed(outcome)
            }
        }
        Err(error) => {
            warn!("call {}: {}", spec.id, error);
            if cancel.is_cancelled() {
                State::Cancelled
            } else if *retries < policy.max_retries {
                *retries += 1;
                debug!(
                    "call {}: retry {}/{} in {:?}",
                    spec.id, *retries, policy.max_retries, policy.delay
                );
                tokio::select! {
                    _ = cancel.cancelled() => State::Cancelled,
                    _ = tokio::time::sleep(policy.delay) => State::Retrying(*retries),
                }
            } else {
                State::Failed(ServiceResponse::app_error(Some(spec.id), Some(error.message)))
            }
        }
    }
}

/// Maps one completed HTTP exchange onto the result container.
///
/// A non-2xx body that does not parse as a structured error object is
/// downgraded to a generic HTTP error. This is an explicit classification
/// branch rather than an exception catch, so genuine parser bugs in success
/// payloads still surface as deserialization errors.
fn classify<T>(call_id: u32, response: RawResponse) -> ServiceResponse<T>
where
    T: DeserializeOwned,
{
    let RawResponse { status, body } = response;
    let code = u32::from(status.as_u16());

    if !status.is_success() {
        if !body.is_empty() {
            warn!("call {}: error body: {}", call_id, body);
        }
        return match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => ServiceResponse::app_error(Some(code), error.message),
            Err(_) => ServiceResponse::http_error(Some(code)),
        };
    }

    if body.is_empty() {
        return ServiceResponse::default();
    }

    match serde_json::from_str::<T>(&body) {
        Ok(data) => ServiceResponse::success(data),
        Err(error) => {
            warn!("call {}: {}: {}", call_id, DESERIALIZE_ERROR_MESSAGE, error);
            ServiceResponse::app_error(None, Some(DESERIALIZE_ERROR_MESSAGE.to_string()))
        }
    }
}
