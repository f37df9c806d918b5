//! Transport boundary: the seam between call execution and the HTTP stack.

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::call::CallSpec;

/// A transport-level failure: no HTTP response was produced at all (DNS,
/// connect, timeout, read). The message may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "transport failure")
        } else {
            write!(f, "transport failure: {}", self.message)
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Status and raw body text of one completed HTTP exchange. Classification
/// happens above this layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one attempt of the given call.
    async fn send(&self, spec: &CallSpec) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with optional body-level logging.
pub struct HttpTransport {
    client: Client,
    log_bodies: bool,
}

impl HttpTransport {
    pub fn new(client: Client, log_bodies: bool) -> Self {
        Self { client, log_bodies }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, spec), fields(call_id = spec.id))]
    async fn send(&self, spec: &CallSpec) -> Result<RawResponse, TransportError> {
        debug!("{} {}", spec.method, spec.url);

        let mut request = self.client.request(spec.method.clone(), &spec.url);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.json_body {
            if self.log_bodies {
                debug!("request body: {}", body);
            }
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        // A body read failure produces no usable response either, so it is
        // surfaced as a transport failure.
        let body = response.text().await?;

        if self.log_bodies {
            debug!("response {} body: {}", status, body);
        }

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[tokio::test]
    async fn test_send_returns_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/items")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(Client::new(), true);
        let spec = CallSpec::new(Method::GET, format!("{}/items", server.url()));
        let response = transport.send(&spec).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_send_passes_query_and_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/items?dry_run=1")
            .match_header("content-type", "application/json")
            .match_body(r#"{"name":"demo"}"#)
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new(Client::new(), false);
        let mut spec = CallSpec::new(Method::POST, format!("{}/items", server.url()));
        spec.query.push(("dry_run".to_string(), "1".to_string()));
        spec.json_body = Some(r#"{"name":"demo"}"#.to_string());
        let response = transport.send(&spec).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_send_reports_connection_failure_as_transport_error() {
        // Bind then drop a listener so the port is closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Client::new(), false);
        let spec = CallSpec::new(Method::GET, format!("http://{}/", addr));
        let error = transport.send(&spec).await.unwrap_err();
        assert!(!error.message.is_empty());
    }

    #[test]
    fn test_transport_error_display() {
        let error = TransportError {
            message: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "transport failure: connection refused");

        let error = TransportError {
            message: String::new(),
        };
        assert_eq!(error.to_string(), "transport failure");
    }
}
