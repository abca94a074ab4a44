//! Parsing of external date and clock-time strings into typed filter bounds.

use std::fmt;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use super::error::DomainError;

/// An `HH:MM` wall-clock time, independent of any date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// How the `time_to` bound compares against an event's local clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeToPrecision {
    /// `(hour, minute) <= (to.hour, to.minute)`
    #[default]
    Minute,
    /// `hour <= to.hour`; the minute of the bound is ignored.
    Hour,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a `YYYY-MM-DD` date as local midnight in `tz`.
///
/// # Errors
/// Returns `DomainError::InvalidDateFormat` unless `value` is exactly a valid `YYYY-MM-DD`.
pub fn parse_date(value: &str, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    let shape_ok = value.len() == 10
        && value.as_bytes()[4] == b'-'
        && value.as_bytes()[7] == b'-'
        && all_digits(&value[0..4])
        && all_digits(&value[5..7])
        && all_digits(&value[8..10]);
    if !shape_ok {
        return Err(DomainError::invalid_date(value));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DomainError::invalid_date(value))?;

    Ok(start_of_day(date, tz))
}

/// First instant of `date` in `tz`.
///
/// Some zones skip midnight on DST days; the first existing local time of the
/// day is used then.
fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    let mut candidate = midnight;
    for _ in 0..=24 * 4 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => {
                return t.with_timezone(&Utc);
            }
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    // Unreachable with real tzdata; treat the wall time as UTC.
    Utc.from_utc_datetime(&midnight)
}

/// Parse a `HH:MM` clock time.
///
/// # Errors
/// Returns `DomainError::InvalidTimeFormat` unless `value` is exactly `HH:MM`
/// with hour in 0..=23 and minute in 0..=59.
pub fn parse_clock_time(value: &str) -> Result<ClockTime, DomainError> {
    let Some((h, m)) = value.split_once(':') else {
        return Err(DomainError::invalid_time(value));
    };
    if h.len() != 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
        return Err(DomainError::invalid_time(value));
    }

    let hour: u32 = h.parse().map_err(|_| DomainError::invalid_time(value))?;
    let minute: u32 = m.parse().map_err(|_| DomainError::invalid_time(value))?;
    if hour > 23 || minute > 59 {
        return Err(DomainError::invalid_time(value));
    }

    Ok(ClockTime { hour, minute })
}
