//! Conversions between table rows and SDK models.

use std::time::Duration;

use calendar_sdk::{Event, User};
use chrono::DateTime;
use chrono_tz::Tz;
use sea_orm::ActiveValue::Set;

use super::entity::{event, user};
use crate::domain::error::DomainError;

/// Convert an event row to the SDK model.
///
/// A row that cannot be decoded means the table was written by something
/// else; it is reported as a storage failure.
impl TryFrom<event::Model> for Event {
    type Error = DomainError;

    fn try_from(model: event::Model) -> Result<Self, Self::Error> {
        let time = DateTime::from_timestamp_micros(model.starts_at_us).ok_or_else(|| {
            DomainError::storage(format!(
                "event {}: starts_at_us {} out of range",
                model.id, model.starts_at_us
            ))
        })?;
        let timezone: Tz = model.timezone.parse().map_err(|_| {
            DomainError::storage(format!(
                "event {}: unknown timezone '{}'",
                model.id, model.timezone
            ))
        })?;
        let duration_ns = u64::try_from(model.duration_ns).map_err(|_| {
            DomainError::storage(format!(
                "event {}: negative duration {}",
                model.id, model.duration_ns
            ))
        })?;
        let notes: Vec<String> = serde_json::from_str(&model.notes)
            .map_err(|e| DomainError::storage(format!("event {}: notes: {e}", model.id)))?;

        Ok(Self {
            id: model.id,
            owner_id: Some(model.owner_id),
            title: model.title,
            description: model.description,
            time,
            timezone,
            duration: Duration::from_nanos(duration_ns),
            notes,
        })
    }
}

/// Build a fully-set active model for `event` owned by `owner_id`.
///
/// # Errors
///
/// Returns `Validation` when the duration does not fit the column.
pub fn event_to_active_model(
    event: &Event,
    owner_id: uuid::Uuid,
) -> Result<event::ActiveModel, DomainError> {
    let duration_ns = i64::try_from(event.duration.as_nanos())
        .map_err(|_| DomainError::validation("duration", "too long"))?;
    let notes = serde_json::to_string(&event.notes)
        .map_err(|e| DomainError::storage(format!("notes: {e}")))?;

    Ok(event::ActiveModel {
        id: Set(event.id),
        owner_id: Set(owner_id),
        title: Set(event.title.clone()),
        description: Set(event.description.clone()),
        starts_at_us: Set(event.time.timestamp_micros()),
        timezone: Set(event.timezone.name().to_owned()),
        duration_ns: Set(duration_ns),
        notes: Set(notes),
    })
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            login: model.login,
            timezone: model.timezone,
        }
    }
}

#[must_use]
pub fn user_to_active_model(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id),
        login: Set(user.login.clone()),
        timezone: Set(user.timezone.clone()),
    }
}
