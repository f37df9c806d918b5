//! Typed result container and server error classification.

use serde::Deserialize;

/// Well-known HTTP status codes surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorCode {
    InvalidRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
}

impl HttpErrorCode {
    /// The numeric status code of this variant.
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Looks up a status code; `None` when no variant matches.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            400 => Some(Self::InvalidRequest),
            401 => Some(Self::Unauthorized),
            404 => Some(Self::NotFound),
            500 => Some(Self::InternalServerError),
            _ => None,
        }
    }
}

/// A failed request outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Non-2xx response whose body was not a structured error object.
    Http { code: Option<u32> },
    /// Structured server error, deserialization failure, or retry
    /// exhaustion. For retry exhaustion the code is the call's identity id,
    /// not an HTTP status.
    App {
        code: Option<u32>,
        message: Option<String>,
    },
}

impl RequestError {
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Http { code } | Self::App { code, .. } => *code,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Http { .. } => None,
            Self::App { message, .. } => message.as_deref(),
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Http { code: Some(code) } => {
                write!(f, "HTTP error {}", code)
            }
            RequestError::Http { code: None } => {
                write!(f, "HTTP error")
            }
            RequestError::App { code, message } => {
                write!(f, "Application error")?;
                if let Some(code) = code {
                    write!(f, " ({})", code)?;
                }
                if let Some(message) = message {
                    write!(f, ": {}", message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Shape of a structured server error body. Any other JSON shape is treated
/// as unparseable and downgraded to [`RequestError::Http`].
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Terminal outcome of one logical request. Absence of an error means the
/// success path, even when the payload is empty. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse<T> {
    data: Option<T>,
    error: Option<RequestError>,
}

impl<T> Default for ServiceResponse<T> {
    /// The empty result: no data, no error. Posted for success responses
    /// without a body.
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T> ServiceResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn http_error(code: Option<u32>) -> Self {
        Self {
            data: None,
            error: Some(RequestError::Http { code }),
        }
    }

    pub fn app_error(code: Option<u32>, message: Option<String>) -> Self {
        Self {
            data: None,
            error: Some(RequestError::App { code, message }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known_status() {
        assert_eq!(HttpErrorCode::from_code(400), Some(HttpErrorCode::InvalidRequest));
        assert_eq!(HttpErrorCode::from_code(401), Some(HttpErrorCode::Unauthorized));
        assert_eq!(HttpErrorCode::from_code(404), Some(HttpErrorCode::NotFound));
        assert_eq!(
            HttpErrorCode::from_code(500),
            Some(HttpErrorCode::InternalServerError)
        );
    }

    #[test]
    fn test_from_code_unmapped_status() {
        assert_eq!(HttpErrorCode::from_code(418), None);
        assert_eq!(HttpErrorCode::from_code(0), None);
    }

    #[test]
    fn test_code_round_trips() {
        for code in [400u32, 401, 404, 500] {
            assert_eq!(HttpErrorCode::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_success_response() {
        let response = ServiceResponse::success(42);
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&42));
        assert!(response.error().is_none());
    }

    #[test]
    fn test_empty_response_counts_as_success() {
        let response: ServiceResponse<()> = ServiceResponse::default();
        assert!(response.is_success());
        assert!(response.data().is_none());
        assert!(response.error().is_none());
    }

    #[test]
    fn test_http_error_response() {
        let response: ServiceResponse<()> = ServiceResponse::http_error(Some(500));
        assert!(!response.is_success());
        let error = response.error().unwrap();
        assert_eq!(error.code(), Some(500));
        assert_eq!(error.message(), None);
    }

    #[test]
    fn test_app_error_response() {
        let response: ServiceResponse<()> =
            ServiceResponse::app_error(Some(404), Some("not found".to_string()));
        let error = response.error().unwrap();
        assert_eq!(error.code(), Some(404));
        assert_eq!(error.message(), Some("not found"));
    }

    #[test]
    fn test_request_error_display() {
        let error = RequestError::Http { code: Some(500) };
        assert_eq!(error.to_string(), "HTTP error 500");

        let error = RequestError::App {
            code: Some(404),
            message: Some("not found".to_string()),
        };
        assert_eq!(error.to_string(), "Application error (404): not found");

        let error = RequestError::App {
            code: None,
            message: None,
        };
        assert_eq!(error.to_string(), "Application error");
    }

    #[test]
    fn test_error_body_tolerates_unknown_fields() {
        let body: ErrorBody = serde_json::from_str(r#"{"status":"failed"}"#).unwrap();
        assert!(body.message.is_none());

        let body: ErrorBody = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_body_rejects_non_objects() {
        assert!(serde_json::from_str::<ErrorBody>("boom").is_err());
        assert!(serde_json::from_str::<ErrorBody>("[1,2]").is_err());
        assert!(serde_json::from_str::<ErrorBody>("").is_err());
    }
}
