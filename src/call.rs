//! Pending calls and cooperative cancellation.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::sync::Notify;

static NEXT_CALL_ID: AtomicU32 = AtomicU32::new(1);

/// Everything needed to issue one outbound request. The transport builds a
/// fresh request from this on every attempt, which is how a failed call is
/// re-issued.
#[derive(Debug, Clone)]
pub struct CallSpec {
    /// Process-unique identity of the logical call. Surfaced as the error
    /// code when the retry ceiling is reached.
    pub id: u32,
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub json_body: Option<String>,
}

impl CallSpec {
    pub fn new(method: Method, url: String) -> Self {
        Self {
            id: NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed),
            method,
            url,
            query: Vec::new(),
            json_body: None,
        }
    }
}

#[derive(Debug, Default)]
struct CancelState {
    flag: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation for one pending call. Cancelling never resolves
/// the call's observable; it also wakes a sleeping retry timer.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(CancelState::default()),
        }
    }

    pub fn cancel(&self) {
        self.state.flag.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }

    /// Resolves once the call has been cancelled.
    pub(crate) async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel()
            // cannot slip between the check and the wait.
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// An unexecuted, re-issuable request expecting a response of type `T`.
pub struct PendingCall<T> {
    spec: CallSpec,
    cancel: CancelHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PendingCall<T> {
    pub(crate) fn new(spec: CallSpec) -> Self {
        Self {
            spec,
            cancel: CancelHandle::new(),
            _marker: PhantomData,
        }
    }

    /// Identity of the logical call, stable across retries.
    pub fn id(&self) -> u32 {
        self.spec.id
    }

    /// Appends one query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.spec.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attaches a JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let serialized =
            serde_json::to_string(body).context("Failed to serialize request body")?;
        self.spec.json_body = Some(serialized);
        Ok(self)
    }

    /// Handle for cancelling this call after it has been handed to the
    /// executor.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub(crate) fn into_parts(self) -> (CallSpec, CancelHandle) {
        (self.spec, self.cancel)
    }
}
