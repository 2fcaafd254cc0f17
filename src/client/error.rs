use serde_json::Value;
use thiserror::Error;

use crate::error::TransformError;
use crate::jsonapi::ErrorObject;

/// Errors of the HTTP client collaborator
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `errors` holds the JSON:API error objects when the body had any.
    #[error("HTTP {status} from {url}{}", first_error(.errors))]
    Status {
        status: u16,
        url: String,
        body: Value,
        errors: Vec<ErrorObject>,
    },

    /// Still 401 after the access token was refreshed
    #[error("Unauthorized: {url}")]
    Unauthorized { url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

fn first_error(errors: &[ErrorObject]) -> String {
    match errors.first() {
        Some(error) if !error.title.is_empty() => format!(": {}", error.title),
        Some(error) if !error.detail.is_empty() => format!(": {}", error.detail),
        _ => String::new(),
    }
}

impl ClientError {
    /// Build a status error from a response body, picking up JSON:API errors
    pub fn status(status: u16, url: impl Into<String>, body: Value) -> Self {
        let errors = body
            .get("errors")
            .cloned()
            .and_then(|errors| serde_json::from_value(errors).ok())
            .unwrap_or_default();
        ClientError::Status { status, url: url.into(), body, errors }
    }

    /// Get HTTP status code, when the error came with one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::InvalidUrl(_) | ClientError::Transform(_) => None,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "HTTP_ERROR",
            ClientError::Unauthorized { .. } => "UNAUTHORIZED",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Transform(err) => err.error_code(),
            ClientError::Status { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_STATUS",
            },
        }
    }
}
