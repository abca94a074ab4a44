#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared fixtures for calendar integration tests.

use std::sync::Arc;
use std::time::Duration;

use calendar::config::DatabaseConfig;
use calendar::domain::repo::{EventStore, UserDirectory};
use calendar::domain::window::TimeToPrecision;
use calendar::infra::storage::db;
use calendar::infra::{
    InMemoryEventStore, InMemoryUserDirectory, SeaOrmEventStore, SeaOrmUserDirectory,
};
use calendar::{CallerContext, EventDraft, User};
use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;
use uuid::Uuid;

/// One backend with a known user acting as caller.
pub struct Fixture {
    pub name: &'static str,
    pub store: Arc<dyn EventStore>,
    pub users: Arc<dyn UserDirectory>,
    pub user: User,
    pub ctx: CallerContext,
}

pub fn test_user(login: &str, timezone: &str) -> User {
    User {
        id: Uuid::new_v4(),
        login: login.to_owned(),
        timezone: timezone.to_owned(),
    }
}

fn ctx_for(user: &User) -> CallerContext {
    CallerContext::builder()
        .caller_id(user.id)
        .caller_timezone(&user.timezone)
        .build()
}

pub fn memory_backend(precision: TimeToPrecision, users: &[User]) -> Fixture {
    let user = users[0].clone();
    Fixture {
        name: "memory",
        store: Arc::new(InMemoryEventStore::new(precision)),
        users: Arc::new(InMemoryUserDirectory::new(users.to_vec())),
        ctx: ctx_for(&user),
        user,
    }
}

pub async fn sqlite_backend(precision: TimeToPrecision, users: &[User]) -> Fixture {
    let conn = db::connect(&DatabaseConfig {
        dsn: "sqlite::memory:".to_owned(),
        max_conns: Some(1),
        min_conns: Some(1),
        ..DatabaseConfig::default()
    })
    .await
    .expect("sqlite in-memory database");

    let directory = SeaOrmUserDirectory::new(conn.clone());
    directory.seed(users).await.unwrap();

    let user = users[0].clone();
    Fixture {
        name: "sqlite",
        store: Arc::new(SeaOrmEventStore::new(conn, precision)),
        users: Arc::new(directory),
        ctx: ctx_for(&user),
        user,
    }
}

/// Both backends, each seeded with `users`; the first user is the caller.
pub async fn backends_with(precision: TimeToPrecision, users: &[User]) -> Vec<Fixture> {
    vec![
        memory_backend(precision, users),
        sqlite_backend(precision, users).await,
    ]
}

pub async fn backends(precision: TimeToPrecision) -> Vec<Fixture> {
    backends_with(precision, &[test_user("alice", "America/New_York")]).await
}

/// An event at a New York wall-clock time.
pub fn ny_event(title: &str, (y, mo, d): (i32, u32, u32), (h, mi): (u32, u32)) -> EventDraft {
    EventDraft {
        id: None,
        owner_id: None,
        title: title.to_owned(),
        description: format!("{title} description"),
        time: New_York
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc),
        timezone: New_York,
        duration: Duration::from_secs(30 * 60),
        notes: vec![format!("{title} note")],
    }
}
