//! REST client configuration layer with a bounded-retry request executor.
//!
//! The application builds a [`ClientConfig`] once at startup, turns it into a
//! [`RestClient`], and passes that handle to every consumer. Each outbound
//! request becomes a [`PendingCall`] which the executor drives to exactly one
//! terminal [`ServiceResponse`], retrying transport-level failures up to a
//! fixed ceiling and classifying server error bodies on the way.
//!
//! ```no_run
//! use restkit::{ClientConfig, RestClient};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Movie {
//!     title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RestClient::new(ClientConfig::default())?;
//!     let call = client.get::<Movie>("/movies/42");
//!     match client.execute(call).outcome().await {
//!         Some(response) if response.is_success() => println!("{:?}", response.into_data()),
//!         Some(response) => eprintln!("request failed: {:?}", response.error()),
//!         None => {} // cancelled, no terminal outcome
//!     }
//!     Ok(())
//! }
//! ```

pub mod call;
pub mod client;
pub mod config;
pub mod date_format;
pub mod executor;
pub mod response;
pub mod transport;

pub use call::{CancelHandle, PendingCall};
pub use client::RestClient;
pub use config::{ClientConfig, RetryPolicy, base_url};
pub use executor::{ResponseHandle, execute_call};
pub use response::{HttpErrorCode, RequestError, ServiceResponse};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
