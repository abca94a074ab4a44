use std::time::Duration;

use calendar_sdk::{Event, EventDraft, EventFilter, Metrics, User};
use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::timezone;

/// Wall-clock layout of `EventDto::time` without a UTC offset.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layout of rendered times. The offset picks the right instant when a
/// wall-clock time repeats at a DST fall-back.
pub const TIME_WITH_OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Event payload and response body.
///
/// `time` is local to `timezone`, optionally followed by its UTC offset
/// (`2021-11-07 01:30:00-06:00`); `duration` is a humantime string such as
/// `1h 30m`. Responses always carry the offset and use the same shape, so a
/// response can be sent back as a save payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub notes: Option<Vec<String>>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: Some(event.id),
            time: event
                .local_time()
                .format(TIME_WITH_OFFSET_FORMAT)
                .to_string(),
            timezone: event.timezone.name().to_owned(),
            duration: humantime::format_duration(event.duration).to_string(),
            title: event.title,
            description: event.description,
            notes: Some(event.notes),
        }
    }
}

impl TryFrom<EventDto> for EventDraft {
    type Error = DomainError;

    fn try_from(dto: EventDto) -> Result<Self, Self::Error> {
        let tz = timezone::resolve(Some(&dto.timezone), None)?;

        let time = parse_time(&dto.time, tz)?;

        let duration = if dto.duration.trim().is_empty() {
            Duration::ZERO
        } else {
            humantime::parse_duration(dto.duration.trim())
                .map_err(|e| DomainError::validation("duration", e.to_string()))?
        };

        Ok(Self {
            id: dto.id,
            owner_id: None,
            title: dto.title,
            description: dto.description,
            time,
            timezone: tz,
            duration,
            notes: dto.notes.unwrap_or_default(),
        })
    }
}

/// Resolve a payload time in `tz`.
///
/// Without an offset an ambiguous wall-clock time takes the earlier instant.
/// With one, the offset must be one `tz` actually uses at that wall-clock time.
fn parse_time(raw: &str, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    let (naive, offset) = match DateTime::parse_from_str(raw, TIME_WITH_OFFSET_FORMAT) {
        Ok(t) => (t.naive_local(), Some(t.offset().fix())),
        Err(_) => {
            let naive = NaiveDateTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| {
                DomainError::validation("time", "expected YYYY-MM-DD HH:MM:SS[+HH:MM]")
            })?;
            (naive, None)
        }
    };

    let candidates = match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => vec![t],
        LocalResult::Ambiguous(earlier, later) => vec![earlier, later],
        LocalResult::None => {
            return Err(DomainError::validation(
                "time",
                format!("{naive} does not exist in {}", tz.name()),
            ));
        }
    };

    let picked = match offset {
        None => candidates.first(),
        Some(offset) => candidates.iter().find(|t| t.offset().fix() == offset),
    };
    picked.map(|t| t.with_timezone(&Utc)).ok_or_else(|| {
        DomainError::validation(
            "time",
            format!("{raw} does not match any offset of {}", tz.name()),
        )
    })
}

/// Query string of `GET /events`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub timezone: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub title: Option<String>,
}

impl From<EventQuery> for EventFilter {
    fn from(q: EventQuery) -> Self {
        Self {
            timezone: q.timezone,
            date_from: q.date_from,
            date_to: q.date_to,
            time_from: q.time_from,
            time_to: q.time_to,
            title: q.title,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTimezoneRequest {
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub login: String,
    pub timezone: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            timezone: user.timezone,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsDto {
    pub events: u64,
    pub users: u64,
}

impl From<Metrics> for MetricsDto {
    fn from(m: Metrics) -> Self {
        Self {
            events: m.events,
            users: m.users,
        }
    }
}
