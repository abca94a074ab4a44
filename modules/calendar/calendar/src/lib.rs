//! Calendar module implementation.
//!
//! Timezone-aware event storage with date, time-of-day and title filters,
//! served over REST and through the in-process `CalendarClientV1`.
//! The public API is defined in `calendar-sdk` and re-exported here.

pub use calendar_sdk::{
    CalendarClientV1, CalendarError, CallerContext, Event, EventDraft, EventFilter, Metrics,
    SaveMode, SaveOutcome, User,
};

pub mod module;
pub use module::CalendarModule;

pub mod config;
pub mod local_client;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

