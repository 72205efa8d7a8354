use kidcard_core::db::migrations::latest_version;
use kidcard_core::db::{open_db, open_db_in_memory};
use kidcard_core::{KeyValueStore, KvError, SqliteKeyValueStore};
use rusqlite::Connection;

#[test]
fn fresh_connection_is_migrated_to_latest() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let tables: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
}

#[test]
fn reopening_a_file_db_is_idempotent_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kidcard.sqlite3");

    {
        let conn = open_db(&db_path).unwrap();
        let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        kv.set("probe", "value").unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert_eq!(kv.get("probe").unwrap().as_deref(), Some("value"));
}

#[test]
fn kv_store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueStore::try_new(&conn) {
        Err(KvError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn kv_store_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKeyValueStore::try_new(&conn),
        Err(KvError::MissingRequiredTable("kv"))
    ));
}

#[test]
fn set_replaces_and_remove_is_tolerant() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(&conn).unwrap();

    kv.set("key", "first").unwrap();
    kv.set("key", "second").unwrap();
    assert_eq!(kv.get("key").unwrap().as_deref(), Some("second"));

    kv.remove("key").unwrap();
    assert_eq!(kv.get("key").unwrap(), None);
    kv.remove("key").unwrap();
}
