// Transform errors
use thiserror::Error;

use crate::schema::ValidationError;

/// Errors raised while turning documents into domain objects or back.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The raw JSON does not match the declared resource schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No resource descriptor registered as '{0}'")]
    UnknownSchema(String),

    /// A single resource was expected and a list was received, or the reverse
    #[error("Unexpected document shape: {0}")]
    UnexpectedShape(String),

    /// A mapped domain object could not be turned into the typed model
    #[error("Model conversion failed for '{schema}': {source}")]
    Model {
        schema: String,
        #[source]
        source: serde_json::Error,
    },

    /// A domain object could not be encoded as write payload
    #[error("Invalid write payload: {0}")]
    Payload(String),
}

impl TransformError {
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        TransformError::UnknownSchema(name.into())
    }

    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        TransformError::UnexpectedShape(message.into())
    }

    pub fn payload(message: impl Into<String>) -> Self {
        TransformError::Payload(message.into())
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TransformError::Validation(_) => "VALIDATION_ERROR",
            TransformError::UnknownSchema(_) => "UNKNOWN_SCHEMA",
            TransformError::UnexpectedShape(_) => "UNEXPECTED_SHAPE",
            TransformError::Model { .. } => "MODEL_ERROR",
            TransformError::Payload(_) => "PAYLOAD_ERROR",
        }
    }

    /// Violations when this is a validation failure
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            TransformError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
