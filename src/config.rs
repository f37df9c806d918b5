//! Client configuration: fixed endpoints, timeouts, retry policy.

use reqwest::Certificate;
use std::time::Duration;

/// Endpoint used by development builds.
pub const BASE_URL_DEV: &str = "https://staging.api.example.com/";

/// Endpoint used by release builds. Currently points at the same host as
/// [`BASE_URL_DEV`].
pub const BASE_URL_PROD: &str = "https://staging.api.example.com/";

/// Fixed format for date fields in JSON payloads. See [`crate::date_format`].
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Connect timeout applied to the underlying HTTP client.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read timeout applied to the underlying HTTP client.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of retry attempts after a transport-level failure.
pub const MAX_RETRIES: u32 = 3;

/// Fixed delay between retry attempts. Not exponential.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Returns the endpoint for the current build mode.
pub fn base_url() -> &'static str {
    if cfg!(debug_assertions) {
        BASE_URL_DEV
    } else {
        BASE_URL_PROD
    }
}

/// Retry policy for transport-level failures. Server-returned errors are
/// never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

/// Explicit client configuration, constructed once at application startup and
/// handed to [`crate::RestClient::new`]. Immutable after construction; the
/// resulting client is shared by clone across all consumers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Root certificate accepted for the API host. When set it replaces the
    /// built-in root store, so only this issuer is trusted and the client is
    /// forced onto HTTPS.
    pub pinned_certificate: Option<Certificate>,
    /// Log request and response bodies at debug level.
    pub log_bodies: bool,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: base_url().to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            pinned_certificate: None,
            log_bodies: true,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_matches_build_mode_endpoint() {
        // Both endpoints are currently identical, so this holds in every
        // build mode.
        assert_eq!(base_url(), BASE_URL_DEV);
        assert_eq!(BASE_URL_DEV, BASE_URL_PROD);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, base_url());
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert!(config.pinned_certificate.is_none());
        assert!(config.log_bodies);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.delay, Duration::from_secs(2));
    }
}
