//! `CalendarClientV1` trait definition.
//!
//! All methods take a `CallerContext`, which carries the caller identity and
//! preferred timezone resolved by the authentication layer.

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::CallerContext;
use crate::errors::CalendarError;
use crate::models::{Event, EventDraft, EventFilter, Metrics, SaveMode, SaveOutcome};

/// Public API trait for the calendar module (Version 1).
#[async_trait]
pub trait CalendarClientV1: Send + Sync {
    /// List events matching the filter. Order is unspecified.
    async fn list_events(
        &self,
        ctx: &CallerContext,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, CalendarError>;

    async fn get_event(&self, ctx: &CallerContext, id: Uuid) -> Result<Event, CalendarError>;

    /// Create or replace an event according to `mode`.
    async fn save_event(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, CalendarError>;

    async fn delete_event(&self, ctx: &CallerContext, id: Uuid) -> Result<(), CalendarError>;

    async fn event_exists(&self, ctx: &CallerContext, id: Uuid) -> Result<bool, CalendarError>;

    async fn metrics(&self, ctx: &CallerContext) -> Result<Metrics, CalendarError>;
}
