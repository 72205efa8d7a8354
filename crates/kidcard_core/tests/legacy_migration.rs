use kidcard_core::db::open_db_in_memory;
use kidcard_core::{
    KeyValueStore, ProfileDraft, ProfileStore, SqliteKeyValueStore, StoreError,
    CHILDREN_LIST_KEY, LEGACY_PROFILE_KEY,
};
use uuid::Uuid;

const LEGACY_RECORD: &str = r#"{"fullName":"Mia Park","age":4,"height":102,"weight":16.5,"gender":"girl","medicalNotes":"Peanut allergy"}"#;

fn draft(name: &str) -> ProfileDraft {
    ProfileDraft {
        full_name: name.to_string(),
        age: 5.0,
        height: 110.0,
        weight: 18.0,
        gender: None,
        medical_notes: None,
    }
}

#[test]
fn first_list_migrates_the_legacy_slot() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, LEGACY_RECORD).unwrap();
    let store = ProfileStore::new(kv);

    let profiles = store.list().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].full_name, "Mia Park");
    assert_eq!(profiles[0].age, 4.0);
    assert_eq!(profiles[0].weight, 16.5);
    assert_eq!(profiles[0].gender.as_deref(), Some("girl"));
    assert!(!profiles[0].id.is_nil());

    let probe = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert!(probe.get(LEGACY_PROFILE_KEY).unwrap().is_none());
    assert!(probe.get(CHILDREN_LIST_KEY).unwrap().is_some());
}

#[test]
fn migration_is_idempotent_across_reads() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, LEGACY_RECORD).unwrap();
    let store = ProfileStore::new(kv);

    let first = store.list().unwrap();
    let second = store.list().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
}

#[test]
fn list_format_takes_precedence_over_legacy_slot() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, LEGACY_RECORD).unwrap();
    let store = ProfileStore::new(kv);

    let migrated = store.list().unwrap();
    let created = store.create(&draft("Ava Lu")).unwrap();

    let profiles = store.list().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].id, migrated[0].id);
    assert_eq!(profiles[1].id, created.id);
}

#[test]
fn empty_store_stays_empty_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let store = ProfileStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    assert!(store.list().unwrap().is_empty());

    let probe = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert!(probe.get(CHILDREN_LIST_KEY).unwrap().is_none());
    assert!(probe.get(LEGACY_PROFILE_KEY).unwrap().is_none());
}

#[test]
fn mutation_runs_migration_before_applying() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, LEGACY_RECORD).unwrap();
    let store = ProfileStore::new(kv);

    store.create(&draft("Ava Lu")).unwrap();

    let profiles = store.list().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].full_name, "Mia Park");
    assert_eq!(profiles[1].full_name, "Ava Lu");

    let probe = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert!(probe.get(LEGACY_PROFILE_KEY).unwrap().is_none());
}

#[test]
fn get_by_id_honors_the_migration_fallback() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, LEGACY_RECORD).unwrap();
    let store = ProfileStore::new(kv);

    let err = store.get_by_id(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    // The lookup missed, but the legacy slot was still reconciled.
    let probe = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert!(probe.get(LEGACY_PROFILE_KEY).unwrap().is_none());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn undecodable_legacy_slot_is_rejected_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(LEGACY_PROFILE_KEY, "not json").unwrap();
    let store = ProfileStore::new(kv);

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));

    let probe = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert_eq!(probe.get(LEGACY_PROFILE_KEY).unwrap().as_deref(), Some("not json"));
    assert!(probe.get(CHILDREN_LIST_KEY).unwrap().is_none());
}

#[test]
fn constraint_violating_legacy_record_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(
        LEGACY_PROFILE_KEY,
        r#"{"fullName":"Mia Park","age":4,"height":102,"weight":1}"#,
    )
    .unwrap();
    let store = ProfileStore::new(kv);

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn corrupt_list_record_is_surfaced_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set(CHILDREN_LIST_KEY, "[{]").unwrap();
    let store = ProfileStore::new(kv);

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
