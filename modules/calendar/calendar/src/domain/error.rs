use calendar_sdk::CalendarError;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid timezone '{value}'")]
    InvalidTimezone { value: String },

    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    #[error("Invalid time '{value}', expected HH:MM")]
    InvalidTimeFormat { value: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Caller is not authorized")]
    Unauthorized,

    #[error("Event not found: {id}")]
    NotFound { id: Uuid },

    #[error("Event already exists: {id}")]
    AlreadyExists { id: Uuid },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },
}

impl DomainError {
    #[must_use]
    pub fn invalid_timezone(value: impl Into<String>) -> Self {
        Self::InvalidTimezone {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn invalid_time(value: impl Into<String>) -> Self {
        Self::InvalidTimeFormat {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn already_exists(id: Uuid) -> Self {
        Self::AlreadyExists { id }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for CalendarError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidTimezone { value } => CalendarError::InvalidTimezone { value },
            DomainError::InvalidDateFormat { value } => CalendarError::InvalidDateFormat { value },
            DomainError::InvalidTimeFormat { value } => CalendarError::InvalidTimeFormat { value },
            DomainError::Validation { field, message } => {
                CalendarError::Validation { field, message }
            }
            DomainError::Unauthorized => CalendarError::Unauthorized,
            DomainError::NotFound { id } => CalendarError::NotFound { id },
            DomainError::AlreadyExists { id } => CalendarError::AlreadyExists { id },
            DomainError::StorageUnavailable { .. } => CalendarError::StorageUnavailable,
        }
    }
}
