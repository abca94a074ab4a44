//! Calendar SDK
//!
//! This crate provides the public API for the calendar module:
//! - `CalendarClientV1` trait for in-process consumers
//! - Model types (`Event`, `EventDraft`, `EventFilter`, `User`)
//! - `CallerContext`, the request-scoped caller identity and timezone
//! - Error type (`CalendarError`)
//!
//! ```ignore
//! let ctx = CallerContext::builder().caller_id(user_id).caller_timezone("Europe/Riga").build();
//! let events = client.list_events(&ctx, &EventFilter::default()).await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod context;
pub mod errors;
pub mod models;

pub use api::CalendarClientV1;
pub use context::CallerContext;
pub use errors::CalendarError;
pub use models::{Event, EventDraft, EventFilter, Metrics, SaveMode, SaveOutcome, User};
