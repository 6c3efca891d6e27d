//! Error types for event store operations.
//!
//! Every failure of the remote event API is classified by an
//! [`ApiErrorCode`]; the controller turns it into a user-visible
//! notification and never retries.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::store::Operation;

/// The category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// The request could not reach or complete against the backend.
    NetworkError,
    /// Missing, invalid or expired credential.
    AuthError,
    /// The backend rejected the payload shape or values.
    ValidationError,
    /// The referenced identifier does not exist.
    NotFound,
    /// The backend failed (5xx) or answered with an unexpected status.
    ServerError,
    /// The response body could not be parsed or normalized.
    InvalidResponse,
    /// Client-side configuration is unusable.
    ConfigurationError,
}

impl ApiErrorCode {
    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::AuthError => "auth_error",
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationError,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::AuthError,
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::ServerError,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error returned by an event store operation.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    /// The operation that failed, when known.
    operation: Option<Operation>,
    /// The HTTP status the backend answered with, when there was one.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            operation: None,
            status: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NetworkError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::AuthError, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ConfigurationError, message)
    }

    /// Creates an error from a non-success HTTP response.
    ///
    /// The body is kept in the message so backend validation details
    /// reach the logs.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("backend answered {}", status)
        } else {
            format!("backend answered {}: {}", status, body)
        };
        let mut error = Self::new(ApiErrorCode::from_status(status), message);
        error.status = Some(status.as_u16());
        error
    }

    /// Classifies a transport failure reported by the HTTP client.
    pub fn from_transport(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timeout".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            format!("request failed: {}", error)
        };
        Self::network(message).with_source(error)
    }

    /// Sets the operation that produced this error.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "[{}] ", operation)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for event store operations.
pub type ApiResult<T> = Result<T, ApiError>;
