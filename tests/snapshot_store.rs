// tests/snapshot_store.rs

use std::error::Error;

use chrono::{TimeZone, Utc};

use pollwatch::errors::PollwatchError;
use pollwatch::fs::mock::MockFileSystem;
use pollwatch::store::{MemorySnapshotStore, SnapshotStore};
use pollwatch::watch::{changed, content_differs, detect};
use pollwatch_test_utils::builders::TargetConfigBuilder;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn latest_is_none_until_recorded() -> TestResult {
    let store = MemorySnapshotStore::new();
    assert_eq!(store.latest("/project", "main.py").await?, None);
    assert!(store.history("/project", "main.py").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn newest_record_wins_and_history_is_kept() -> TestResult {
    let mut store = MemorySnapshotStore::new();
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    store.record("/project", "main.py", b"v1", t1).await?;
    store.record("/project", "other.py", b"x", t1).await?;
    store.record("/project", "main.py", b"v2", t2).await?;

    assert_eq!(store.latest("/project", "main.py").await?, Some(b"v2".to_vec()));
    assert_eq!(store.latest("/project", "other.py").await?, Some(b"x".to_vec()));

    let history = store.history("/project", "main.py").await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, b"v2");
    assert_eq!(history[0].modified_at, t2);
    assert_eq!(history[1].content, b"v1");
    assert!(history[0].id > history[1].id);
    assert_eq!(store.len(), 3);
    Ok(())
}

#[tokio::test]
async fn keys_are_scoped_by_root() -> TestResult {
    let mut store = MemorySnapshotStore::new();
    store.record("/a", "main.py", b"a", Utc::now()).await?;

    assert_eq!(store.latest("/b", "main.py").await?, None);
    Ok(())
}

#[test]
fn never_recorded_counts_as_changed_even_when_empty() {
    assert!(content_differs(None, b""));
    assert!(content_differs(None, b"v1"));
    assert!(!content_differs(Some(b"".as_slice()), b""));
    assert!(!content_differs(Some(b"v1".as_slice()), b"v1"));
    assert!(content_differs(Some(b"v1".as_slice()), b"v1\n"));
    assert!(content_differs(Some(b"line\n".as_slice()), b"line\r\n"));
}

#[tokio::test]
async fn detector_compares_with_latest_snapshot() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");
    let target = TargetConfigBuilder::new("/project").command("true").target();
    let mut store = MemorySnapshotStore::new();

    let first = detect(&fs, &store, &target, "main.py").await?;
    assert!(first.changed);
    assert!(first.first_seen);
    assert_eq!(first.content, b"v1");

    store.record("/project", "main.py", b"v1", Utc::now()).await?;
    assert!(!changed(&fs, &store, &target, "main.py").await?);

    fs.add_file("/project/main.py", "v2");
    let second = detect(&fs, &store, &target, "main.py").await?;
    assert!(second.changed);
    assert!(!second.first_seen);
    Ok(())
}

#[tokio::test]
async fn empty_new_file_is_reported_as_changed() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/project/empty.txt", "");
    let target = TargetConfigBuilder::new("/project").command("true").target();
    let store = MemorySnapshotStore::new();

    assert!(changed(&fs, &store, &target, "empty.txt").await?);
    Ok(())
}

#[tokio::test]
async fn vanished_file_is_fatal() {
    let fs = MockFileSystem::new();
    fs.add_dir("/project");
    let target = TargetConfigBuilder::new("/project").command("true").target();
    let store = MemorySnapshotStore::new();

    match detect(&fs, &store, &target, "gone.py").await {
        Err(err @ PollwatchError::FileUnreadable { .. }) => assert!(err.is_fatal()),
        other => panic!("expected FileUnreadable, got {other:?}"),
    }
}
