use std::time::Duration;

use calendar_sdk::Event;
use chrono::{TimeZone, Utc};
use sea_orm::ActiveValue;
use uuid::Uuid;

use super::entity::event;
use super::mapper::event_to_active_model;
use crate::domain::error::DomainError;

fn row() -> event::Model {
    event::Model {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        title: "Dentist".to_owned(),
        description: "bring x-rays".to_owned(),
        starts_at_us: 1_627_794_061_000_000,
        timezone: "America/New_York".to_owned(),
        duration_ns: 5_400_000_000_000,
        notes: r#"["floss","call ahead"]"#.to_owned(),
    }
}

#[test]
fn test_row_to_event() {
    let model = row();
    let event = Event::try_from(model.clone()).unwrap();

    assert_eq!(event.id, model.id);
    assert_eq!(event.owner_id, Some(model.owner_id));
    assert_eq!(
        event.time,
        Utc.with_ymd_and_hms(2021, 8, 1, 5, 1, 1).unwrap()
    );
    assert_eq!(event.timezone, chrono_tz::America::New_York);
    assert_eq!(event.duration, Duration::from_secs(90 * 60));
    assert_eq!(event.notes, vec!["floss", "call ahead"]);
}

#[test]
fn test_event_to_active_model() {
    let event = Event::try_from(row()).unwrap();
    let owner = Uuid::new_v4();

    let active = event_to_active_model(&event, owner).unwrap();

    assert_eq!(active.owner_id, ActiveValue::Set(owner));
    assert_eq!(active.starts_at_us, ActiveValue::Set(1_627_794_061_000_000));
    assert_eq!(active.duration_ns, ActiveValue::Set(5_400_000_000_000));
    assert_eq!(
        active.notes,
        ActiveValue::Set(r#"["floss","call ahead"]"#.to_owned())
    );
}

#[test]
fn test_corrupt_rows_are_storage_errors() {
    let mut bad_tz = row();
    bad_tz.timezone = "Moon/Base".to_owned();
    assert!(matches!(
        Event::try_from(bad_tz),
        Err(DomainError::StorageUnavailable { .. })
    ));

    let mut bad_notes = row();
    bad_notes.notes = "not json".to_owned();
    assert!(matches!(
        Event::try_from(bad_notes),
        Err(DomainError::StorageUnavailable { .. })
    ));
}

#[test]
fn test_oversized_duration_is_rejected() {
    let mut event = Event::try_from(row()).unwrap();
    event.duration = Duration::from_secs(u64::MAX);

    assert!(matches!(
        event_to_active_model(&event, Uuid::new_v4()),
        Err(DomainError::Validation { .. })
    ));
}
