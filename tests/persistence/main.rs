//! Integration tests for filter persistence (PersistentState + FilterState derive).


use filters::{MessageFilters, ProjectFilters};
use folio_state::{
    FilterState, InMemoryStorage, KeyValueStore, PersistError, PersistentState, StorageError,
};
use serde_json::{json, Value};

#[test]
fn derive_uses_explicit_and_default_keys() {
    assert_eq!(ProjectFilters::STORAGE_KEY, "projects-filters");
    assert_eq!(MessageFilters::STORAGE_KEY, "message_filters");
}

#[test]
fn round_trips_through_a_fresh_instance() {
    let storage = InMemoryStorage::new();
    let value = ProjectFilters {
        search: "rust".into(),
        filter: "featured".into(),
        sort_by: "date".into(),
        page: 4,
    };

    let mut state: PersistentState<ProjectFilters, _> =
        PersistentState::for_filter(storage.clone());
    state.reset();
    state.set(value.clone());
    drop(state);

    let reloaded: PersistentState<ProjectFilters, _> = PersistentState::for_filter(storage);
    assert_eq!(reloaded.value(), &value);
}

#[test]
fn corrupt_slot_yields_default_without_panicking() {
    let storage = InMemoryStorage::new();
    storage
        .set_item(ProjectFilters::STORAGE_KEY, "}}not-json{{")
        .unwrap();

    let state: PersistentState<ProjectFilters, _> = PersistentState::for_filter(storage.clone());
    assert_eq!(state.value(), &ProjectFilters::default());
    assert!(matches!(state.last_error(), Some(PersistError::Serde(_))));

    // Left untouched until the next explicit write.
    assert_eq!(
        storage.get_item(ProjectFilters::STORAGE_KEY).unwrap().as_deref(),
        Some("}}not-json{{")
    );
}

#[test]
fn updater_result_is_readable_from_storage() {
    let storage = InMemoryStorage::new();
    let mut state = PersistentState::open(storage.clone(), "k", json!({ "page": 1 }));

    state.update(|prev| {
        let mut next = prev.clone();
        next["page"] = json!(2);
        next
    });

    let raw = storage.get_item("k").unwrap().unwrap();
    let decoded: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, json!({ "page": 2 }));
}

#[test]
fn instances_on_different_keys_do_not_interfere() {
    let storage = InMemoryStorage::new();
    let mut projects: PersistentState<ProjectFilters, _> =
        PersistentState::for_filter(storage.clone());
    let mut messages: PersistentState<MessageFilters, _> =
        PersistentState::for_filter(storage.clone());

    projects.update(|p| ProjectFilters {
        page: 3,
        ..p.clone()
    });
    messages.update(|m| MessageFilters {
        unread_only: true,
        ..m.clone()
    });

    let projects: PersistentState<ProjectFilters, _> = PersistentState::for_filter(storage.clone());
    let messages: PersistentState<MessageFilters, _> = PersistentState::for_filter(storage);
    assert_eq!(projects.value().page, 3);
    assert!(messages.value().unread_only);
    assert_eq!(messages.value().page, 0);
}

#[test]
fn quota_failure_is_reported_not_raised() {
    let storage = InMemoryStorage::with_quota(16);
    let mut state: PersistentState<ProjectFilters, _> =
        PersistentState::for_filter(storage.clone());

    state.update(|p| ProjectFilters {
        search: "a search long enough to blow the quota".into(),
        ..p.clone()
    });

    assert_eq!(state.value().search, "a search long enough to blow the quota");
    assert!(matches!(
        state.last_error(),
        Some(PersistError::Storage(StorageError::QuotaExceeded { .. }))
    ));
    assert!(storage.is_empty());
}

#[test]
fn disabled_storage_degrades_to_memory_only() {
    let storage = InMemoryStorage::disabled();
    let mut state: PersistentState<ProjectFilters, _> = PersistentState::for_filter(storage);
    assert!(state.is_hydrated());

    state.update(|p| ProjectFilters {
        page: 2,
        ..p.clone()
    });
    assert_eq!(state.value().page, 2);
    assert!(matches!(
        state.last_error(),
        Some(PersistError::Storage(StorageError::Unavailable(_)))
    ));
}

#[test]
fn lazy_instance_hydrates_on_demand() {
    let storage = InMemoryStorage::new();
    storage
        .set_item("k", r#"{"unread_only":true,"page":5}"#)
        .unwrap();

    let mut state = PersistentState::new(storage, "k", MessageFilters::default());
    assert_eq!(state.value(), &MessageFilters::default());

    assert!(state.hydrate());
    assert_eq!(state.value().page, 5);
}
