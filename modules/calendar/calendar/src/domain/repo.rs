//! Storage traits used by the domain service.

use async_trait::async_trait;
use calendar_sdk::{CallerContext, Event, EventDraft, EventFilter, SaveMode, SaveOutcome, User};
use uuid::Uuid;

use super::error::DomainError;

/// Event storage.
///
/// Implementations are interchangeable: the in-memory store and the
/// relational store satisfy the same contract and are picked by
/// configuration.
///
/// `save` checks its `SaveMode` and writes in one atomic step. Calling
/// `exists` and then `save` is NOT atomic; another writer may act in between.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create or replace an event. A draft without an id gets a fresh one.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` for `SaveMode::CreateOnly` when the id is taken
    /// - `NotFound` for `SaveMode::ReplaceOnly` when the id is absent
    /// - `Unauthorized` when the store requires a known caller
    async fn save(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, DomainError>;

    /// # Errors
    ///
    /// Returns `NotFound` if no such event is visible to the caller.
    async fn get(&self, ctx: &CallerContext, id: Uuid) -> Result<Event, DomainError>;

    /// Events matching every clause of `filter`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed filter field.
    async fn list(&self, ctx: &CallerContext, filter: &EventFilter)
    -> Result<Vec<Event>, DomainError>;

    /// # Errors
    ///
    /// Returns `NotFound` if the event is absent; nothing is changed then.
    async fn delete(&self, ctx: &CallerContext, id: Uuid) -> Result<(), DomainError>;

    async fn exists(&self, ctx: &CallerContext, id: Uuid) -> Result<bool, DomainError>;

    /// Total number of stored events, regardless of owner.
    async fn count(&self, ctx: &CallerContext) -> Result<u64, DomainError>;
}

/// Lookup and maintenance of calendar users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Store a new preferred timezone. The name is validated by the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user does not exist.
    async fn update_timezone(&self, id: Uuid, timezone: &str) -> Result<User, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
