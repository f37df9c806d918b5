//! Configured client handle: builds the shared HTTP client once and hands
//! out typed pending calls.
//!
//! Remote capabilities are plain traits the application defines over the
//! typed constructors here, for example:
//!
//! ```no_run
//! use async_trait::async_trait;
//! use restkit::{RestClient, ServiceResponse};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Movie {
//!     title: String,
//! }
//!
//! #[async_trait]
//! trait MovieService {
//!     async fn movie(&self, id: u32) -> Option<ServiceResponse<Movie>>;
//! }
//!
//! #[async_trait]
//! impl MovieService for RestClient {
//!     async fn movie(&self, id: u32) -> Option<ServiceResponse<Movie>> {
//!         let call = self.get::<Movie>(&format!("/movies/{}", id));
//!         self.execute(call).outcome().await
//!     }
//! }
//! ```

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::call::{CallSpec, PendingCall};
use crate::config::{ClientConfig, RetryPolicy};
use crate::executor::{ResponseHandle, execute_call};
use crate::transport::{HttpTransport, Transport};

/// Shared, immutably configured REST client. Construct once at application
/// startup and pass by clone or reference to every consumer.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    retry: RetryPolicy,
}

impl RestClient {
    /// Builds the underlying HTTP client from the given configuration. When
    /// a pinned certificate is present it replaces the built-in root store
    /// and the client is restricted to HTTPS.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .https_only(config.pinned_certificate.is_some());

        if let Some(certificate) = config.pinned_certificate.clone() {
            builder = builder
                .tls_built_in_root_certs(false)
                .add_root_certificate(certificate);
        }

        let client = builder.build().context("Failed to build HTTP client")?;
        debug!("rest client initialized for {}", config.base_url);

        Ok(Self {
            transport: Arc::new(HttpTransport::new(client, config.log_bodies)),
            base_url: config.base_url,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a typed request against a path under the base URL.
    pub fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> PendingCall<T> {
        PendingCall::new(CallSpec::new(method, self.absolute_url(path)))
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> PendingCall<T> {
        self.call(Method::GET, path)
    }

    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<PendingCall<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path).json(body)
    }

    /// Executes a pending call with this client's transport and retry
    /// policy. Returns the observable immediately.
    pub fn execute<T>(&self, call: PendingCall<T>) -> ResponseHandle<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        execute_call(Arc::clone(&self.transport), self.retry, call)
    }

    fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
