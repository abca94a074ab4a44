//! Filter predicate evaluation.
//!
//! A `TimeWindow` is an `EventFilter` with every bound parsed against the
//! effective timezone. It is built once per list query and then evaluated
//! against each candidate event.

use calendar_sdk::{Event, EventFilter};
use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;

use super::error::DomainError;
use super::timezone;
use super::window::{ClockTime, TimeToPrecision, parse_clock_time, parse_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    timezone: Tz,
    date_from: Option<DateTime<Utc>>,
    date_until: Option<DateTime<Utc>>,
    time_from: Option<ClockTime>,
    time_to: Option<ClockTime>,
    title: Option<String>,
    precision: TimeToPrecision,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl TimeWindow {
    /// Resolve the effective timezone and parse every bound of `filter`.
    ///
    /// # Errors
    /// Returns `InvalidTimezone`, `InvalidDateFormat` or `InvalidTimeFormat`
    /// for malformed filter fields.
    pub fn parse(
        filter: &EventFilter,
        context_timezone: Option<&str>,
        precision: TimeToPrecision,
    ) -> Result<Self, DomainError> {
        let tz = timezone::resolve(filter.timezone.as_deref(), context_timezone)?;

        let date_from = non_empty(filter.date_from.as_ref())
            .map(|s| parse_date(s, tz))
            .transpose()?;
        let date_until = non_empty(filter.date_to.as_ref())
            .map(|s| parse_date(s, tz).map(|d| d + Duration::hours(24)))
            .transpose()?;
        let time_from = non_empty(filter.time_from.as_ref())
            .map(parse_clock_time)
            .transpose()?;
        let time_to = non_empty(filter.time_to.as_ref())
            .map(parse_clock_time)
            .transpose()?;
        let title = non_empty(filter.title.as_ref()).map(str::to_lowercase);

        Ok(Self {
            timezone: tz,
            date_from,
            date_until,
            time_from,
            time_to,
            title,
            precision,
        })
    }

    /// Inclusive lower bound on the instant.
    #[must_use]
    pub fn date_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
    }

    /// Exclusive upper bound on the instant (`date_to` midnight + 24h).
    #[must_use]
    pub fn date_until(&self) -> Option<DateTime<Utc>> {
        self.date_until
    }

    #[must_use]
    pub fn has_time_of_day(&self) -> bool {
        self.time_from.is_some() || self.time_to.is_some()
    }

    /// All clauses combined.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.matches_date_range(event) && self.matches_title(event) && self.matches_time_of_day(event)
    }

    #[must_use]
    pub fn matches_date_range(&self, event: &Event) -> bool {
        if let Some(from) = self.date_from {
            if event.time < from {
                return false;
            }
        }
        if let Some(until) = self.date_until {
            if event.time >= until {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn matches_title(&self, event: &Event) -> bool {
        self.title
            .as_deref()
            .is_none_or(|needle| event.title.to_lowercase().contains(needle))
    }

    /// Time-of-day clauses, read against the event's local clock in the
    /// effective timezone, whatever its date.
    #[must_use]
    pub fn matches_time_of_day(&self, event: &Event) -> bool {
        if !self.has_time_of_day() {
            return true;
        }

        let local = event.time.with_timezone(&self.timezone);
        let clock = ClockTime {
            hour: local.hour(),
            minute: local.minute(),
        };

        if let Some(from) = self.time_from {
            if clock < from {
                return false;
            }
        }
        if let Some(to) = self.time_to {
            let within = match self.precision {
                TimeToPrecision::Minute => clock <= to,
                TimeToPrecision::Hour => clock.hour <= to.hour,
            };
            if !within {
                return false;
            }
        }
        true
    }
}
