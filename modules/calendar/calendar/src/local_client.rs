//! Local client implementing the `CalendarClientV1` trait.

use std::sync::Arc;

use async_trait::async_trait;
use calendar_sdk::{
    CalendarClientV1, CalendarError, CallerContext, Event, EventDraft, EventFilter, Metrics,
    SaveMode, SaveOutcome,
};
use uuid::Uuid;

use crate::domain::service::Service;

/// In-process client delegating to the domain service.
pub struct CalendarLocalClient {
    service: Arc<Service>,
}

impl CalendarLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CalendarClientV1 for CalendarLocalClient {
    async fn list_events(
        &self,
        ctx: &CallerContext,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, CalendarError> {
        self.service
            .list_events(ctx, filter)
            .await
            .map_err(CalendarError::from)
    }

    async fn get_event(&self, ctx: &CallerContext, id: Uuid) -> Result<Event, CalendarError> {
        self.service
            .get_event(ctx, id)
            .await
            .map_err(CalendarError::from)
    }

    async fn save_event(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, CalendarError> {
        self.service
            .save_event(ctx, draft, mode)
            .await
            .map_err(CalendarError::from)
    }

    async fn delete_event(&self, ctx: &CallerContext, id: Uuid) -> Result<(), CalendarError> {
        self.service
            .delete_event(ctx, id)
            .await
            .map_err(CalendarError::from)
    }

    async fn event_exists(&self, ctx: &CallerContext, id: Uuid) -> Result<bool, CalendarError> {
        self.service
            .event_exists(ctx, id)
            .await
            .map_err(CalendarError::from)
    }

    async fn metrics(&self, ctx: &CallerContext) -> Result<Metrics, CalendarError> {
        self.service.metrics(ctx).await.map_err(CalendarError::from)
    }
}
