//! `SeaORM` event store.

use async_trait::async_trait;
use calendar_sdk::{CallerContext, Event, EventDraft, EventFilter, SaveMode, SaveOutcome};
use chrono::SubsecRound;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::db_err;
use super::entity::{event, user};
use super::mapper::event_to_active_model;
use crate::domain::error::DomainError;
use crate::domain::filter::TimeWindow;
use crate::domain::repo::EventStore;
use crate::domain::window::TimeToPrecision;

/// Relational event store.
///
/// Every operation except `count` acts on behalf of a known user and only
/// sees that user's events. Date bounds are pushed down to the query; title
/// and time-of-day clauses are applied to the fetched rows.
pub struct SeaOrmEventStore {
    db: DatabaseConnection,
    precision: TimeToPrecision,
}

impl SeaOrmEventStore {
    #[must_use]
    pub fn new(db: DatabaseConnection, precision: TimeToPrecision) -> Self {
        Self { db, precision }
    }

    /// Id of the calling user, who must exist in the `users` table.
    async fn acting_user<C: ConnectionTrait>(
        conn: &C,
        ctx: &CallerContext,
    ) -> Result<Uuid, DomainError> {
        let caller = ctx.caller_id().ok_or(DomainError::Unauthorized)?;
        let found = user::Entity::find_by_id(caller)
            .one(conn)
            .await
            .map_err(db_err)?;
        match found {
            Some(user) => Ok(user.id),
            None => {
                debug!(caller_id = %caller, "Caller is not a known user");
                Err(DomainError::Unauthorized)
            }
        }
    }

    fn owned(owner: Uuid, id: Uuid) -> Condition {
        Condition::all()
            .add(event::Column::Id.eq(id))
            .add(event::Column::OwnerId.eq(owner))
    }
}

#[async_trait]
impl EventStore for SeaOrmEventStore {
    async fn save(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let owner = Self::acting_user(&txn, ctx).await?;

        let id = draft.id.unwrap_or_else(Uuid::now_v7);
        let mut event = draft.into_event(id);
        event.owner_id = Some(owner);
        // `starts_at_us` holds microseconds; return what a later `get` reads
        event.time = event.time.trunc_subsecs(6);
        let active = event_to_active_model(&event, owner)?;

        let existing = event::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let created = match (existing, mode) {
            // another owner's event is invisible to replace, but its id stays taken
            (Some(row), SaveMode::ReplaceOnly) if row.owner_id != owner => {
                return Err(DomainError::not_found(id));
            }
            (Some(row), _) if row.owner_id != owner => {
                return Err(DomainError::already_exists(id));
            }
            (Some(_), SaveMode::CreateOnly) => return Err(DomainError::already_exists(id)),
            (None, SaveMode::ReplaceOnly) => return Err(DomainError::not_found(id)),
            (Some(_), _) => {
                active.update(&txn).await.map_err(db_err)?;
                false
            }
            (None, _) => {
                active.insert(&txn).await.map_err(db_err)?;
                true
            }
        };

        txn.commit().await.map_err(db_err)?;
        Ok(SaveOutcome { event, created })
    }

    async fn get(&self, ctx: &CallerContext, id: Uuid) -> Result<Event, DomainError> {
        let owner = Self::acting_user(&self.db, ctx).await?;

        let row = event::Entity::find()
            .filter(Self::owned(owner, id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found(id))?;

        Event::try_from(row)
    }

    async fn list(
        &self,
        ctx: &CallerContext,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, DomainError> {
        let owner = Self::acting_user(&self.db, ctx).await?;
        let window = TimeWindow::parse(filter, ctx.caller_timezone(), self.precision)?;

        let mut condition = Condition::all().add(event::Column::OwnerId.eq(owner));
        if let Some(from) = window.date_from() {
            condition = condition.add(event::Column::StartsAtUs.gte(from.timestamp_micros()));
        }
        if let Some(until) = window.date_until() {
            condition = condition.add(event::Column::StartsAtUs.lt(until.timestamp_micros()));
        }

        let rows = event::Entity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let event = Event::try_from(row)?;
            if window.matches_title(&event) && window.matches_time_of_day(&event) {
                events.push(event);
            }
        }
        Ok(events)
    }

    async fn delete(&self, ctx: &CallerContext, id: Uuid) -> Result<(), DomainError> {
        let owner = Self::acting_user(&self.db, ctx).await?;

        let result = event::Entity::delete_many()
            .filter(Self::owned(owner, id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(id));
        }
        Ok(())
    }

    async fn exists(&self, ctx: &CallerContext, id: Uuid) -> Result<bool, DomainError> {
        let owner = Self::acting_user(&self.db, ctx).await?;

        let count = event::Entity::find()
            .filter(Self::owned(owner, id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count(&self, _ctx: &CallerContext) -> Result<u64, DomainError> {
        event::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
