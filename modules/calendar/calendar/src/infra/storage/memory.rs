//! In-memory event store and user directory.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use calendar_sdk::{CallerContext, Event, EventDraft, EventFilter, SaveMode, SaveOutcome, User};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::filter::TimeWindow;
use crate::domain::repo::{EventStore, UserDirectory};
use crate::domain::window::TimeToPrecision;

/// Process-local event store.
///
/// One `RwLock` guards the whole map: lists run in parallel, writes are
/// exclusive. Nothing is awaited while the lock is held. Events are not
/// owner-scoped here; a save without an owner records the caller.
pub struct InMemoryEventStore {
    events: RwLock<HashMap<Uuid, Event>>,
    precision: TimeToPrecision,
}

impl InMemoryEventStore {
    #[must_use]
    pub fn new(precision: TimeToPrecision) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            precision,
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new(TimeToPrecision::default())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(
        &self,
        ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, DomainError> {
        let id = draft.id.unwrap_or_else(Uuid::now_v7);
        let mut event = draft.into_event(id);
        if event.owner_id.is_none() {
            event.owner_id = ctx.caller_id();
        }

        let mut events = self.events.write();
        let created = match events.entry(id) {
            Entry::Occupied(_) if mode == SaveMode::CreateOnly => {
                return Err(DomainError::already_exists(id));
            }
            Entry::Vacant(_) if mode == SaveMode::ReplaceOnly => {
                return Err(DomainError::not_found(id));
            }
            Entry::Occupied(mut slot) => {
                slot.insert(event.clone());
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(event.clone());
                true
            }
        };

        Ok(SaveOutcome { event, created })
    }

    async fn get(&self, _ctx: &CallerContext, id: Uuid) -> Result<Event, DomainError> {
        self.events
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(id))
    }

    async fn list(
        &self,
        ctx: &CallerContext,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, DomainError> {
        let window = TimeWindow::parse(filter, ctx.caller_timezone(), self.precision)?;

        let events = self.events.read();
        Ok(events
            .values()
            .filter(|event| window.matches(event))
            .cloned()
            .collect())
    }

    async fn delete(&self, _ctx: &CallerContext, id: Uuid) -> Result<(), DomainError> {
        self.events
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(id))
    }

    async fn exists(&self, _ctx: &CallerContext, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.events.read().contains_key(&id))
    }

    async fn count(&self, _ctx: &CallerContext) -> Result<u64, DomainError> {
        Ok(self.events.read().len() as u64)
    }
}

/// Users known to the process, seeded from configuration.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserDirectory {
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn update_timezone(&self, id: Uuid, timezone: &str) -> Result<User, DomainError> {
        let mut users = self.users.write();
        let user = users.get_mut(&id).ok_or_else(|| DomainError::not_found(id))?;
        timezone.clone_into(&mut user.timezone);
        Ok(user.clone())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.users.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            id: None,
            owner_id: None,
            title: title.to_owned(),
            description: "desc".to_owned(),
            time: Utc.with_ymd_and_hms(2021, 8, 1, 12, 0, 0).unwrap(),
            timezone: chrono_tz::America::New_York,
            duration: Duration::from_secs(3600),
            notes: vec!["bring snacks".to_owned()],
        }
    }

    #[tokio::test]
    async fn save_assigns_id_and_records_caller_as_owner() {
        let store = InMemoryEventStore::default();
        let caller = Uuid::new_v4();
        let ctx = CallerContext::builder().caller_id(caller).build();

        let outcome = store.save(&ctx, draft("a"), SaveMode::Upsert).await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.event.owner_id, Some(caller));
        assert_eq!(outcome.event.id.get_version_num(), 7);
        assert_eq!(store.get(&ctx, outcome.event.id).await.unwrap(), outcome.event);
    }

    #[tokio::test]
    async fn upsert_replaces_every_field() {
        let store = InMemoryEventStore::default();
        let ctx = CallerContext::anonymous();
        let first = store.save(&ctx, draft("a"), SaveMode::Upsert).await.unwrap();

        let mut replacement = draft("b");
        replacement.id = Some(first.event.id);
        replacement.notes = vec![];
        let second = store
            .save(&ctx, replacement, SaveMode::Upsert)
            .await
            .unwrap();

        assert!(!second.created);
        let stored = store.get(&ctx, first.event.id).await.unwrap();
        assert_eq!(stored.title, "b");
        assert!(stored.notes.is_empty());
        assert_eq!(store.count(&ctx).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn user_directory_updates_timezone() {
        let id = Uuid::new_v4();
        let users = InMemoryUserDirectory::new([User {
            id,
            login: "bob".to_owned(),
            timezone: "UTC".to_owned(),
        }]);

        let updated = users.update_timezone(id, "Asia/Tokyo").await.unwrap();
        assert_eq!(updated.timezone, "Asia/Tokyo");
        assert_eq!(users.find(id).await.unwrap().unwrap().timezone, "Asia/Tokyo");
        assert_eq!(users.count().await.unwrap(), 1);

        assert!(matches!(
            users.update_timezone(Uuid::new_v4(), "UTC").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
