#![forbid(unsafe_code)]

use mq_client::{
    FileFlagStore, FlagStore, LoadState, PARENT_MODE_KEY, Reconciliation, Session, SessionConfig,
    SqliteGateway, SyncConfig, SyncError,
};
use mq_core::ids::MissionId;
use mq_core::pin::PinSecret;
use mq_core::policy::MilestonePolicy;
use mq_storage::SqliteStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("mq_client_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

async fn open_session(dir: &Path, config: SessionConfig) -> Session {
    let store = SqliteStore::open(dir).expect("open store");
    let gateway = Arc::new(SqliteGateway::new(store));
    let (session, report) =
        Session::open(gateway, Box::new(FileFlagStore::in_dir(dir)), config).await;
    assert!(!report.is_degraded(), "load failed: {report:?}");
    session
}

#[tokio::test]
async fn parent_mode_persists_in_flag_file_across_reload() {
    let dir = temp_dir("pin_reload");
    let mut session = open_session(&dir, SessionConfig::default()).await;
    assert!(!session.is_parent_mode());

    let err = session.unlock("4321").expect_err("wrong pin");
    assert_eq!(err.to_string(), "Incorrect PIN. Please try again.");
    session.unlock("1234").expect("unlock");
    drop(session);

    let flags = FileFlagStore::in_dir(&dir);
    assert_eq!(
        flags.get(PARENT_MODE_KEY).expect("read flag").as_deref(),
        Some("true")
    );

    let mut reloaded = open_session(&dir, SessionConfig::default()).await;
    assert!(reloaded.is_parent_mode());
    reloaded.exit_parent_mode();
    drop(reloaded);

    let relocked = open_session(&dir, SessionConfig::default()).await;
    assert!(!relocked.is_parent_mode());
}

#[tokio::test]
async fn custom_pin_replaces_default() {
    let dir = temp_dir("custom_pin");
    let config = SessionConfig {
        pin: PinSecret::try_new("9081").expect("pin"),
        ..SessionConfig::default()
    };
    let mut session = open_session(&dir, config).await;
    assert!(session.unlock("1234").is_err());
    session.unlock("9081").expect("unlock");
    assert!(session.is_parent_mode());
}

#[tokio::test]
async fn full_flow_against_sqlite() {
    let dir = temp_dir("full_flow");
    let mut session = open_session(&dir, SessionConfig::default()).await;
    assert_eq!(session.sync().state().load_state(), LoadState::Ready);
    assert_eq!(session.sync().state().milestone().goal, 100);

    session.unlock("1234").expect("unlock");
    let feed = session
        .add_mission("Feed the fish", "a pinch of food", "3")
        .await
        .expect("add");
    let sweep = session
        .add_mission("Sweep", "the porch", "1")
        .await
        .expect("add");
    let listed: Vec<MissionId> = session
        .sync()
        .state()
        .missions()
        .iter()
        .map(|mission| mission.id)
        .collect();
    assert_eq!(listed, vec![sweep.id, feed.id]);

    let on = session.toggle(feed.id).await.expect("toggle");
    assert_eq!(on.reconciliation, Reconciliation::NotNeeded);
    session.toggle(feed.id).await.expect("toggle back");
    assert_eq!(session.sync().state().milestone().value, 30);

    session.delete_mission(feed.id).await.expect("delete");
    let again = session
        .add_mission("Feed the fish", "again", "3")
        .await
        .expect("re-add");
    assert!(again.id.get() > feed.id.get());
    drop(session);

    let reloaded = open_session(&dir, SessionConfig::default()).await;
    let state = reloaded.sync().state();
    assert_eq!(state.mission_count(), 2);
    assert!(state.mission(feed.id).is_none());
    assert_eq!(state.milestone().value, 30);
    assert_eq!(state.stats().total, 100);
}

#[tokio::test]
async fn symmetric_policy_round_trips_through_store() {
    let dir = temp_dir("symmetric");
    let config = SessionConfig {
        sync: SyncConfig {
            milestone_policy: MilestonePolicy::Symmetric,
            ..SyncConfig::default()
        },
        ..SessionConfig::default()
    };
    let mut session = open_session(&dir, config.clone()).await;
    session.unlock("1234").expect("unlock");
    let mission = session
        .add_mission("Homework", "math sheet", "5")
        .await
        .expect("add");

    session.toggle(mission.id).await.expect("on");
    session.toggle(mission.id).await.expect("off");
    drop(session);

    let reloaded = open_session(&dir, config).await;
    assert_eq!(reloaded.sync().state().milestone().value, 0);
    assert!(!reloaded.sync().state().missions()[0].completed);
}

#[tokio::test]
async fn deleting_a_mission_another_session_removed_drops_it_locally() {
    let dir = temp_dir("vanished");
    let mut first = open_session(&dir, SessionConfig::default()).await;
    first.unlock("1234").expect("unlock");
    let mission = first
        .add_mission("Laundry", "fold it", "2")
        .await
        .expect("add");

    let mut second = open_session(&dir, SessionConfig::default()).await;
    second.delete_mission(mission.id).await.expect("delete");

    let removed = first
        .delete_mission(mission.id)
        .await
        .expect("already gone counts as deleted");
    assert_eq!(removed.id, mission.id);
    assert_eq!(first.sync().state().mission_count(), 0);

    let err = first
        .delete_mission(mission.id)
        .await
        .expect_err("no longer listed");
    assert!(matches!(err, SyncError::UnknownMission(_)));
    assert_eq!(err.code(), "UNKNOWN_ID");
}
