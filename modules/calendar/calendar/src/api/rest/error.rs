//! REST error mapping for the calendar module.

use axum::http::StatusCode;

use super::problem::{Problem, ValidationViolation};
use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, Problem>;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());

        let mut violations = None;
        let (status, code, title, detail) = match &e {
            DomainError::InvalidTimezone { .. } => (
                StatusCode::BAD_REQUEST,
                "CALENDAR_INVALID_TIMEZONE",
                "Invalid timezone",
                e.to_string(),
            ),
            DomainError::InvalidDateFormat { .. } => (
                StatusCode::BAD_REQUEST,
                "CALENDAR_INVALID_DATE",
                "Invalid date",
                e.to_string(),
            ),
            DomainError::InvalidTimeFormat { .. } => (
                StatusCode::BAD_REQUEST,
                "CALENDAR_INVALID_TIME",
                "Invalid time",
                e.to_string(),
            ),
            DomainError::Validation { field, message } => {
                violations = Some(vec![ValidationViolation {
                    field: field.clone(),
                    message: message.clone(),
                }]);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CALENDAR_VALIDATION",
                    "Validation failed",
                    e.to_string(),
                )
            }
            DomainError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "CALENDAR_UNAUTHORIZED",
                "Unauthorized",
                "A valid token for a known user is required".to_owned(),
            ),
            DomainError::NotFound { id } => (
                StatusCode::NOT_FOUND,
                "CALENDAR_NOT_FOUND",
                "Not found",
                format!("No event with id {id}"),
            ),
            DomainError::AlreadyExists { id } => (
                StatusCode::CONFLICT,
                "CALENDAR_ALREADY_EXISTS",
                "Event already exists",
                format!("Event with id {id} already exists"),
            ),
            DomainError::StorageUnavailable { message } => {
                tracing::error!(error = %message, "Storage failure in calendar");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CALENDAR_STORAGE_UNAVAILABLE",
                    "Internal Server Error",
                    "An internal error occurred".to_owned(),
                )
            }
        };

        let mut problem = Problem::new(status, title, detail)
            .with_type(format!("https://errors.calendar.local/{code}"))
            .with_code(code);

        if let Some(errors) = violations {
            problem = problem.with_errors(errors);
        }
        if let Some(id) = trace_id {
            problem = problem.with_trace_id(id);
        }

        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use uuid::Uuid;

    #[test]
    fn test_input_errors_are_bad_request() {
        for err in [
            DomainError::invalid_timezone("Mars/Base"),
            DomainError::invalid_date("2021/08/01"),
            DomainError::invalid_time("7pm"),
        ] {
            let problem: Problem = err.into();
            assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_validation_carries_field() {
        let problem: Problem = DomainError::validation("duration", "not a duration").into();
        assert_eq!(problem.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            problem.errors.unwrap(),
            vec![ValidationViolation {
                field: "duration".to_owned(),
                message: "not a duration".to_owned(),
            }]
        );
    }

    #[test]
    fn test_lookup_errors() {
        let id = Uuid::new_v4();
        let problem: Problem = DomainError::not_found(id).into();
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert!(problem.detail.contains(&id.to_string()));

        let problem: Problem = DomainError::already_exists(id).into();
        assert_eq!(problem.status, StatusCode::CONFLICT);

        let problem: Problem = DomainError::Unauthorized.into();
        assert_eq!(problem.status, StatusCode::UNAUTHORIZED);
    }

    #[traced_test]
    #[test]
    fn test_storage_error_is_logged_not_exposed() {
        let problem: Problem = DomainError::storage("password authentication failed").into();
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!problem.detail.contains("password"));
        assert!(logs_contain("Storage failure in calendar"));
    }
}
