use mq_core::model::MilestoneSettings;
use mq_storage::{SqliteStore, StoreError};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_storage_dir(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    path.push(format!("mq-storage-schema-{label}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&path).expect("temp storage dir must be creatable");
    path
}

#[test]
fn fresh_store_provisions_default_milestone() {
    let dir = temp_storage_dir("fresh");
    let store = SqliteStore::open(&dir).expect("fresh storage should open");
    assert_eq!(
        store.milestone_settings().expect("milestone row"),
        MilestoneSettings { goal: 100, value: 0 }
    );
    assert_eq!(store.mission_count().expect("count"), 0);
    assert!(dir.join(store.db_file_name()).exists());
}

#[test]
fn reopen_keeps_data_and_schema() {
    let dir = temp_storage_dir("reopen");
    {
        let mut store = SqliteStore::open(&dir).expect("open");
        store.increment_milestone(40).expect("increment");
    }
    let store = SqliteStore::open(&dir).expect("reopen must pass preflight");
    assert_eq!(store.milestone_settings().expect("milestone").value, 40);
}

#[test]
fn open_is_fail_closed_on_foreign_schema() {
    let dir = temp_storage_dir("foreign");
    let conn = Connection::open(dir.join("mission_quest.db")).expect("db must open");
    conn.execute("CREATE TABLE chores(id INTEGER PRIMARY KEY)", [])
        .expect("foreign table should be created");
    drop(conn);

    let err = SqliteStore::open(&dir).expect_err("foreign storage must be rejected");
    assert_eq!(err.code(), "RESET_REQUIRED");
    assert!(matches!(
        err,
        StoreError::InvalidInput(message) if message.starts_with("RESET_REQUIRED")
    ));
}

#[test]
fn open_rejects_schema_version_mismatch() {
    let dir = temp_storage_dir("version");
    drop(SqliteStore::open(&dir).expect("open"));

    let conn = Connection::open(dir.join("mission_quest.db")).expect("db must open");
    conn.execute("UPDATE store_state SET schema_version = 99", [])
        .expect("version bump");
    drop(conn);

    let err = SqliteStore::open(&dir).expect_err("version mismatch must be rejected");
    assert_eq!(err.code(), "RESET_REQUIRED");
    assert_eq!(
        err.to_string(),
        "invalid input: RESET_REQUIRED: schema version mismatch"
    );
}
