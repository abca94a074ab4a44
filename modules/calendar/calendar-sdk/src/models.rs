//! Public models for the calendar module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the calendar module and its consumers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

/// A calendar event.
///
/// `time` is the absolute instant; `timezone` only decides how that instant is
/// displayed and how date/time-of-day filters are read against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub time: DateTime<Utc>,
    pub timezone: Tz,
    pub duration: Duration,
    pub notes: Vec<String>,
}

impl Event {
    /// The event's instant rendered in its own timezone.
    #[must_use]
    pub fn local_time(&self) -> DateTime<Tz> {
        self.time.with_timezone(&self.timezone)
    }
}

/// Payload of a save: a full event whose id may still be unassigned.
///
/// A save replaces every field of the stored event; nothing is merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub time: DateTime<Utc>,
    pub timezone: Tz,
    pub duration: Duration,
    pub notes: Vec<String>,
}

impl EventDraft {
    #[must_use]
    pub fn into_event(self, id: Uuid) -> Event {
        Event {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            time: self.time,
            timezone: self.timezone,
            duration: self.duration,
            notes: self.notes,
        }
    }
}

impl From<Event> for EventDraft {
    fn from(event: Event) -> Self {
        Self {
            id: Some(event.id),
            owner_id: event.owner_id,
            title: event.title,
            description: event.description,
            time: event.time,
            timezone: event.timezone,
            duration: event.duration,
            notes: event.notes,
        }
    }
}

/// How a save treats an existing event with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Create when absent, fully replace when present.
    #[default]
    Upsert,
    /// Fail with `AlreadyExists` when the id is taken.
    CreateOnly,
    /// Fail with `NotFound` when the id is absent.
    ReplaceOnly,
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub event: Event,
    pub created: bool,
}

/// List filter. Every field is optional and raw: bounds are parsed once per
/// query by the store, against the effective timezone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// IANA timezone override, e.g. `America/Chicago`.
    pub timezone: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub date_from: Option<String>,
    /// `YYYY-MM-DD`, inclusive through the end of that day.
    pub date_to: Option<String>,
    /// `HH:MM`, inclusive.
    pub time_from: Option<String>,
    /// `HH:MM`, inclusive.
    pub time_to: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
}

/// A calendar user as seen by the core: identity plus timezone preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub events: u64,
    pub users: u64,
}
