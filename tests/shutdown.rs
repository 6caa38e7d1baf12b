// tests/shutdown.rs
#![cfg(unix)]

// Sends SIGINT to the test process itself, so it lives in its own test binary.

use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use pollwatch::engine::{LoopOptions, WatchLoop};
use pollwatch::exec::ProcessActionRunner;
use pollwatch::fs::RealFileSystem;
use pollwatch::shutdown_signal;
use pollwatch::store::MemorySnapshotStore;
use pollwatch_test_utils::builders::TargetConfigBuilder;
use pollwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn interrupt_during_first_pass_stops_after_that_pass() -> TestResult {
    init_tracing();
    let root = tempdir()?;
    let aux = tempdir()?;
    fs::write(root.path().join("a.txt"), "a")?;
    fs::write(root.path().join("b.txt"), "b")?;

    let script = aux.path().join("interrupt.sh");
    fs::write(&script, format!("kill -INT {}\n", std::process::id()))?;

    let target = TargetConfigBuilder::new(root.path())
        .command(&format!("sh {}", script.display()))
        .command("echo done")
        .log(aux.path().join("watch.log"))
        .target();

    let shutdown = shutdown_signal()?;
    let wl = WatchLoop::new(
        vec![target],
        Arc::new(RealFileSystem),
        MemorySnapshotStore::new(),
        ProcessActionRunner::new(),
        LoopOptions {
            interval: Duration::from_secs(3600),
            single_pass: false,
        },
    );

    // Without the interrupt the loop would sleep for an hour after pass 1.
    tokio::time::timeout(Duration::from_secs(10), wl.run_until(shutdown)).await??;

    let log = fs::read_to_string(aux.path().join("watch.log"))?;
    assert_eq!(log.lines().filter(|l| *l == "done").count(), 2);
    assert_eq!(log.lines().filter(|l| l.starts_with("Committed: ")).count(), 2);
    Ok(())
}
