//! Effective timezone resolution.
//!
//! Precedence: explicit filter value, then the caller's preferred timezone,
//! then UTC. Only an explicitly requested timezone can fail the operation;
//! a malformed caller preference degrades to UTC.

use chrono_tz::Tz;

use super::error::DomainError;

pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `DomainError::InvalidTimezone` if the name is not in the timezone database.
pub fn validate(name: &str) -> Result<Tz, DomainError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DomainError::invalid_timezone(name))
}

/// Resolve the effective timezone for one operation.
///
/// # Errors
/// Returns `DomainError::InvalidTimezone` if `explicit` is non-empty and unknown.
pub fn resolve(explicit: Option<&str>, context: Option<&str>) -> Result<Tz, DomainError> {
    if let Some(name) = explicit.filter(|s| !s.trim().is_empty()) {
        return validate(name);
    }

    if let Some(name) = context.filter(|s| !s.trim().is_empty()) {
        return Ok(validate(name).unwrap_or_else(|_| {
            tracing::warn!(
                timezone = %name,
                "Caller timezone is not a known IANA name, falling back to UTC"
            );
            DEFAULT_TIMEZONE
        }));
    }

    Ok(DEFAULT_TIMEZONE)
}
