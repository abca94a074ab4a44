//! Error types for the calendar SDK.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid timezone '{value}'")]
    InvalidTimezone { value: String },

    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    #[error("Invalid time '{value}', expected HH:MM")]
    InvalidTimeFormat { value: String },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Caller is not authorized")]
    Unauthorized,

    #[error("Event not found: {id}")]
    NotFound { id: Uuid },

    #[error("Event already exists: {id}")]
    AlreadyExists { id: Uuid },

    #[error("Storage unavailable")]
    StorageUnavailable,
}

impl CalendarError {
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the failure was caused by the caller's input.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimezone { .. }
                | Self::InvalidDateFormat { .. }
                | Self::InvalidTimeFormat { .. }
                | Self::Validation { .. }
        )
    }
}
