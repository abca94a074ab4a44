use std::sync::Arc;

use calendar_sdk::{
    CallerContext, Event, EventDraft, EventFilter, Metrics, SaveMode, SaveOutcome, User,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::{EventStore, UserDirectory};
use super::timezone;

/// Domain service for calendar events and the users that own them.
///
/// Storage backends are injected; the service itself holds no state.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn EventStore>,
    users: Arc<dyn UserDirectory>,
}

impl Service {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    /// # Errors
    ///
    /// Malformed filter fields, `Unauthorized` for owner-scoped stores, or
    /// `StorageUnavailable`.
    pub async fn list_events(
        &self,
        ctx: &CallerContext,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, DomainError> {
        debug!(caller_id = ?ctx.caller_id(), ?filter, "Listing events");

        let events = self.store.list(ctx, filter).await?;

        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// # Errors
    ///
    /// `NotFound` when the event is absent or not visible to the caller.
    pub async fn get_event(&self, ctx: &CallerContext, id: Uuid) -> Result<Event, DomainError> {
        debug!(event_id = %id, "Getting event");
        self.store.get(ctx, id).await
    }

    /// Store `draft` under `mode`.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` or `NotFound` when `mode` forbids the write,
    /// `Unauthorized` or `StorageUnavailable` from the store.
    pub async fn save_event(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, DomainError> {
        let outcome = self.store.save(ctx, draft, mode).await?;

        info!(
            event_id = %outcome.event.id,
            created = outcome.created,
            ?mode,
            "Saved event"
        );
        Ok(outcome)
    }

    /// # Errors
    ///
    /// `NotFound` when nothing was deleted.
    pub async fn delete_event(&self, ctx: &CallerContext, id: Uuid) -> Result<(), DomainError> {
        self.store.delete(ctx, id).await?;
        info!(event_id = %id, "Deleted event");
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn event_exists(&self, ctx: &CallerContext, id: Uuid) -> Result<bool, DomainError> {
        self.store.exists(ctx, id).await
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn metrics(&self, ctx: &CallerContext) -> Result<Metrics, DomainError> {
        let events = self.store.count(ctx).await?;
        let users = self.users.count().await?;
        Ok(Metrics { events, users })
    }

    /// Resolve a token subject to a known user.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when no such user exists.
    pub async fn authenticate(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    /// Change the caller's preferred timezone.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` without a caller id
    /// - `InvalidTimezone` for an unknown IANA name
    pub async fn update_timezone(
        &self,
        ctx: &CallerContext,
        timezone_name: &str,
    ) -> Result<User, DomainError> {
        let caller = ctx.caller_id().ok_or(DomainError::Unauthorized)?;
        let tz = timezone::validate(timezone_name)?;

        let user = self.users.update_timezone(caller, tz.name()).await?;

        info!(caller_id = %caller, timezone = %user.timezone, "Updated user timezone");
        Ok(user)
    }
}
