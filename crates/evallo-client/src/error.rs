//! Client error types.

use std::fmt;

use evallo_api::ApiError;
use evallo_core::ValidationErrors;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Backend request failed.
    Api(String),
    /// Form input did not validate.
    Invalid(ValidationErrors),
    /// No event with the given identifier.
    UnknownEvent(String),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open browser, etc).
    Action(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Api(msg) => write!(f, "api error: {}", msg),
            Self::Invalid(errors) => write!(f, "{}", errors),
            Self::UnknownEvent(id) => write!(f, "no event with id `{}`", id),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        Self::Api(err.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}
