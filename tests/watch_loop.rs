// tests/watch_loop.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use pollwatch::engine::{CycleStage, FileOutcome, LoopOptions, WatchLoop};
use pollwatch::errors::PollwatchError;
use pollwatch::fs::mock::MockFileSystem;
use pollwatch::store::{MemorySnapshotStore, SnapshotStore};
use pollwatch::target::Target;
use pollwatch_test_utils::builders::TargetConfigBuilder;
use pollwatch_test_utils::fake_runner::FakeActionRunner;
use pollwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn project_target(root: &str, log_dir: &Path) -> Target {
    TargetConfigBuilder::new(root)
        .command("make")
        .log(log_dir.join(format!("{}.log", root.trim_start_matches('/'))))
        .target()
}

fn watch_loop(
    targets: Vec<Target>,
    fs: &MockFileSystem,
    runner: &FakeActionRunner,
) -> WatchLoop<MemorySnapshotStore, FakeActionRunner> {
    WatchLoop::new(
        targets,
        Arc::new(fs.clone()),
        MemorySnapshotStore::new(),
        runner.clone(),
        LoopOptions {
            interval: Duration::from_millis(10),
            single_pass: false,
        },
    )
}

#[tokio::test]
async fn unchanged_files_never_trigger_again() -> TestResult {
    init_tracing();
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");
    fs.add_file("/project/util.py", "u1");

    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);

    let first = wl.run_pass().await?;
    assert_eq!(first.actions_run(), 2);
    assert_eq!(runner.call_count(), 2);

    for _ in 0..3 {
        let report = wl.run_pass().await?;
        let target = report.target("/project").unwrap();
        assert_eq!(target.unchanged(), 2);
        assert_eq!(report.actions_run(), 0);
    }
    assert_eq!(runner.call_count(), 2);
    assert_eq!(wl.store().len(), 2);
    assert_eq!(wl.core().stage(), CycleStage::Idle);
    Ok(())
}

#[tokio::test]
async fn every_changed_file_runs_the_pipeline_once() -> TestResult {
    init_tracing();
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/a.py", "a");
    fs.add_file("/project/b.py", "b");
    fs.add_file("/project/c.py", "c");

    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);
    wl.run_pass().await?;

    fs.add_file("/project/a.py", "a2");
    fs.add_file("/project/c.py", "c2");
    let report = wl.run_pass().await?;

    let target = report.target("/project").unwrap();
    assert_eq!(target.outcome_of("a.py"), Some(&FileOutcome::Committed));
    assert_eq!(target.outcome_of("b.py"), Some(&FileOutcome::Unchanged));
    assert_eq!(target.outcome_of("c.py"), Some(&FileOutcome::Committed));

    let calls: Vec<String> = runner.calls().into_iter().skip(3).map(|(_, f)| f).collect();
    assert_eq!(calls, vec!["a.py", "c.py"]);
    Ok(())
}

#[tokio::test]
async fn failed_pipeline_does_not_commit_and_retries() -> TestResult {
    init_tracing();
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");

    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);
    wl.run_pass().await?;

    fs.add_file("/project/main.py", "v2");
    runner.set_failing(true);

    for attempt in 1..=3u32 {
        let report = wl.run_pass().await?;
        let target = report.target("/project").unwrap();
        assert!(matches!(
            target.outcome_of("main.py"),
            Some(FileOutcome::ActionFailed(_))
        ));
        assert_eq!(
            wl.store().latest("/project", "main.py").await?,
            Some(b"v1".to_vec())
        );
        assert_eq!(wl.core().failure_streak("/project", "main.py"), attempt);
    }

    runner.set_failing(false);
    let report = wl.run_pass().await?;
    assert_eq!(
        report.target("/project").unwrap().outcome_of("main.py"),
        Some(&FileOutcome::Committed)
    );
    assert_eq!(
        wl.store().latest("/project", "main.py").await?,
        Some(b"v2".to_vec())
    );
    assert_eq!(wl.core().failure_streak("/project", "main.py"), 0);

    // 1 initial + 3 failed + 1 recovered.
    assert_eq!(runner.call_count(), 5);
    Ok(())
}

#[tokio::test]
async fn commit_supersedes_but_keeps_history() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/f", "C1");

    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);
    wl.run_pass().await?;
    fs.add_file("/project/f", "C2");
    wl.run_pass().await?;

    assert_eq!(wl.store().latest("/project", "f").await?, Some(b"C2".to_vec()));
    let history = wl.store().history("/project", "f").await?;
    let contents: Vec<&[u8]> = history.iter().map(|r| r.content.as_slice()).collect();
    assert_eq!(contents, vec![b"C2".as_slice(), b"C1".as_slice()]);
    // Mock clock advances on every write, so the second record is newer.
    assert!(history[0].modified_at > history[1].modified_at);
    Ok(())
}

#[tokio::test]
async fn targets_are_processed_in_configuration_order() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/beta/b.txt", "b");
    fs.add_file("/alpha/a.txt", "a");

    let runner = FakeActionRunner::succeeding();
    let targets = vec![
        project_target("/beta", logs.path()),
        project_target("/alpha", logs.path()),
    ];
    let mut wl = watch_loop(targets, &fs, &runner);
    let report = wl.run_pass().await?;

    let roots: Vec<&str> = report.targets.iter().map(|t| t.root.as_str()).collect();
    assert_eq!(roots, vec!["/beta", "/alpha"]);
    assert_eq!(
        runner.calls(),
        vec![
            ("/beta".to_string(), "b.txt".to_string()),
            ("/alpha".to_string(), "a.txt".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn excluded_files_are_never_detected() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/build.log", "noise");
    fs.add_file("/project/main.rs", "fn main() {}");

    let target = TargetConfigBuilder::new("/project")
        .command("make")
        .exclude(r"\.log$")
        .log(logs.path().join("project.log"))
        .target();
    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![target], &fs, &runner);
    let report = wl.run_pass().await?;

    assert_eq!(report.target("/project").unwrap().tracked, vec!["main.rs"]);
    assert_eq!(wl.store().latest("/project", "build.log").await?, None);
    Ok(())
}

#[tokio::test]
async fn target_log_records_tracking_and_commits() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");

    let runner = FakeActionRunner::succeeding();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);
    wl.run_pass().await?;

    let log = fs::read_to_string(logs.path().join("project.log"))?;
    assert!(log.contains("Tracking: /project"));
    assert!(log.contains("File tracked: main.py"));
    assert!(log.contains("fake pipeline ok for main.py"));
    assert!(log.contains("Committed: main.py"));
    Ok(())
}

#[tokio::test]
async fn missing_root_stops_the_loop_with_a_fatal_error() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    let runner = FakeActionRunner::succeeding();
    let wl = watch_loop(vec![project_target("/nowhere", logs.path())], &fs, &runner);

    let result = with_timeout(wl.run()).await;
    match result {
        Err(err @ PollwatchError::DirectoryUnreadable { .. }) => assert!(err.is_fatal()),
        other => panic!("expected DirectoryUnreadable, got {other:?}"),
    }
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn run_until_stops_on_shutdown_between_passes() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");
    let runner = FakeActionRunner::succeeding();
    let wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);

    with_timeout(wl.run_until(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }))
    .await?;

    // Several passes may have run, but the unchanged file triggered only once.
    assert_eq!(runner.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn shutdown_pending_before_first_pass_still_completes_it() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/a.py", "a");
    fs.add_file("/project/b.py", "b");
    let runner = FakeActionRunner::succeeding();
    let wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);

    with_timeout(wl.run_until(std::future::ready(()))).await?;

    assert_eq!(runner.call_count(), 2);
    let log = fs::read_to_string(logs.path().join("project.log"))?;
    assert_eq!(log.lines().filter(|l| l.starts_with("Committed: ")).count(), 2);
    Ok(())
}

#[tokio::test]
async fn failure_streak_is_dropped_once_the_file_disappears() -> TestResult {
    let logs = tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("/project/main.py", "v1");
    fs.add_file("/project/util.py", "u1");

    let runner = FakeActionRunner::failing();
    let mut wl = watch_loop(vec![project_target("/project", logs.path())], &fs, &runner);
    wl.run_pass().await?;
    wl.run_pass().await?;
    assert_eq!(wl.core().failure_streak("/project", "main.py"), 2);
    assert_eq!(wl.core().failure_streak("/project", "util.py"), 2);

    fs.remove("/project/main.py");
    wl.run_pass().await?;

    assert_eq!(wl.core().failure_streak("/project", "main.py"), 0);
    assert_eq!(wl.core().failure_streak("/project", "util.py"), 3);
    Ok(())
}
