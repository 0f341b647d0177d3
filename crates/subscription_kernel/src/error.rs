//! Core error types used across the record model

use thiserror::Error;

use crate::temporal::TemporalError;

/// Core error type for the kernel and the domain entities
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown field '{field}' on {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Field '{0}' cannot be changed")]
    ImmutableField(String),

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        CoreError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Checks if this error came from decoding or encoding JSON
    pub fn is_serialization(&self) -> bool {
        matches!(self, CoreError::Serialization(_))
    }
}
