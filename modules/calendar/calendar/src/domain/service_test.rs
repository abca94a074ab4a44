use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use calendar_sdk::{
    CallerContext, Event, EventDraft, EventFilter, SaveMode, SaveOutcome, User,
};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::error::DomainError;
use super::repo::{EventStore, UserDirectory};
use super::service::Service;

// Mock store that records the last save and returns canned results
#[derive(Default)]
struct MockStore {
    saved: Mutex<Vec<(EventDraft, SaveMode)>>,
    count: u64,
    fail_storage: bool,
}

#[async_trait]
impl EventStore for MockStore {
    async fn save(
        &self,
        _ctx: &CallerContext,
        draft: EventDraft,
        mode: SaveMode,
    ) -> Result<SaveOutcome, DomainError> {
        if self.fail_storage {
            return Err(DomainError::storage("disk on fire"));
        }
        self.saved.lock().push((draft.clone(), mode));
        let id = draft.id.unwrap_or_else(Uuid::now_v7);
        Ok(SaveOutcome {
            event: draft.into_event(id),
            created: true,
        })
    }

    async fn get(&self, _ctx: &CallerContext, id: Uuid) -> Result<Event, DomainError> {
        Err(DomainError::not_found(id))
    }

    async fn list(
        &self,
        _ctx: &CallerContext,
        _filter: &EventFilter,
    ) -> Result<Vec<Event>, DomainError> {
        Ok(vec![])
    }

    async fn delete(&self, _ctx: &CallerContext, id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::not_found(id))
    }

    async fn exists(&self, _ctx: &CallerContext, _id: Uuid) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn count(&self, _ctx: &CallerContext) -> Result<u64, DomainError> {
        if self.fail_storage {
            return Err(DomainError::storage("disk on fire"));
        }
        Ok(self.count)
    }
}

struct MockUsers {
    users: Mutex<Vec<User>>,
}

impl MockUsers {
    fn with(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserDirectory for MockUsers {
    async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
    }

    async fn update_timezone(&self, id: Uuid, timezone: &str) -> Result<User, DomainError> {
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::Unauthorized)?;
        timezone.clone_into(&mut user.timezone);
        Ok(user.clone())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.users.lock().len() as u64)
    }
}

fn alice() -> User {
    User {
        id: Uuid::new_v4(),
        login: "alice".to_owned(),
        timezone: "Europe/Riga".to_owned(),
    }
}

fn draft() -> EventDraft {
    EventDraft {
        id: None,
        owner_id: None,
        title: "Standup".to_owned(),
        description: String::new(),
        time: Utc.with_ymd_and_hms(2021, 8, 2, 7, 0, 0).unwrap(),
        timezone: chrono_tz::Europe::Riga,
        duration: Duration::from_secs(900),
        notes: vec![],
    }
}

fn service(store: MockStore, users: Vec<User>) -> (Service, Arc<MockStore>) {
    let store = Arc::new(store);
    let service = Service::new(store.clone(), Arc::new(MockUsers::with(users)));
    (service, store)
}

#[tokio::test]
async fn test_save_event_passes_mode_through() {
    let (service, store) = service(MockStore::default(), vec![]);
    let ctx = CallerContext::anonymous();

    let outcome = service
        .save_event(&ctx, draft(), SaveMode::CreateOnly)
        .await
        .unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.event.title, "Standup");
    let saved = store.saved.lock();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].1, SaveMode::CreateOnly);
}

#[tokio::test]
async fn test_metrics_combines_event_and_user_counts() {
    let (service, _) = service(
        MockStore {
            count: 7,
            ..MockStore::default()
        },
        vec![alice(), alice()],
    );

    let metrics = service.metrics(&CallerContext::anonymous()).await.unwrap();

    assert_eq!(metrics.events, 7);
    assert_eq!(metrics.users, 2);
}

#[tokio::test]
async fn test_storage_errors_propagate() {
    let (service, _) = service(
        MockStore {
            fail_storage: true,
            ..MockStore::default()
        },
        vec![],
    );

    let err = service
        .metrics(&CallerContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::StorageUnavailable { .. }));
}

#[tokio::test]
async fn test_authenticate_unknown_user_is_unauthorized() {
    let user = alice();
    let (service, _) = service(MockStore::default(), vec![user.clone()]);

    assert_eq!(service.authenticate(user.id).await.unwrap(), user);
    assert!(matches!(
        service.authenticate(Uuid::new_v4()).await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_update_timezone_requires_caller() {
    let (service, _) = service(MockStore::default(), vec![alice()]);

    let err = service
        .update_timezone(&CallerContext::anonymous(), "Europe/Athens")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn test_update_timezone_validates_name() {
    let user = alice();
    let (service, _) = service(MockStore::default(), vec![user.clone()]);
    let ctx = CallerContext::builder().caller_id(user.id).build();

    let err = service
        .update_timezone(&ctx, "Europe/Atlantis")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTimezone { .. }));

    let updated = service.update_timezone(&ctx, " Asia/Tokyo ").await.unwrap();
    assert_eq!(updated.timezone, "Asia/Tokyo");
}
