// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod store;
pub mod target;
pub mod types;
pub mod watch;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile, DbSettings};
use crate::engine::{LoopOptions, WatchLoop};
use crate::errors::{PollwatchError, Result};
use crate::exec::ProcessActionRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::store::{MemorySnapshotStore, PgSnapshotStore};
use crate::target::Target;
use crate::types::{parse_duration, StoreBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - database settings + snapshot store
/// - action runner
/// - the watch loop
/// - Ctrl-C handling (installed before the first pass, honoured between passes)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    info!(config = ?config_path, "reading config");
    let cfg = load_and_validate(&config_path)?;
    info!(targets = cfg.targets().len(), "config loaded");

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let interval = effective_interval(args.interval.as_deref(), &cfg)?;
    let backend = args.store.unwrap_or(cfg.store());
    let options = LoopOptions {
        interval,
        single_pass: args.once,
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let targets = cfg.into_targets();
    let runner = ProcessActionRunner::new();

    info!(?backend, "monitoring");
    match backend {
        StoreBackend::Postgres => {
            let settings = DbSettings::from_env(args.env_file.as_deref())?;
            debug!(?settings, "database settings");
            let store = PgSnapshotStore::connect(settings.connect_options()?).await?;
            let shutdown = shutdown_signal()?;
            WatchLoop::new(targets, fs, store, runner, options)
                .run_until(shutdown)
                .await
        }
        StoreBackend::Memory => {
            warn!("memory store selected; snapshots are lost on exit");
            let shutdown = shutdown_signal()?;
            WatchLoop::new(targets, fs, MemorySnapshotStore::new(), runner, options)
                .run_until(shutdown)
                .await
        }
    }
}

/// `--interval` wins over `[config].interval`.
fn effective_interval(cli: Option<&str>, cfg: &ConfigFile) -> Result<Duration> {
    let Some(raw) = cli else {
        return Ok(cfg.interval());
    };
    let interval = parse_duration(raw)
        .map_err(|e| PollwatchError::ConfigError(format!("--interval: {e}")))?;
    if interval.is_zero() {
        return Err(PollwatchError::ConfigError(
            "--interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

/// Install the Ctrl-C handler and return a future resolving on the first
/// interrupt.
///
/// The handler is registered when this function returns, not when the future
/// is first polled, so an interrupt arriving during the first pass is held
/// until the loop sleeps instead of killing the process.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(async move {
        interrupt.recv().await;
    })
}

#[cfg(windows)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut interrupt = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        interrupt.recv().await;
    })
}

/// Simple dry-run output: print the interval, store and every target.
fn print_dry_run(cfg: &ConfigFile) {
    println!("pollwatch dry-run");
    println!("  config.interval = {:?}", cfg.interval());
    println!("  config.store = {:?}", cfg.store());
    println!();

    println!("targets ({}):", cfg.targets().len());
    for target in cfg.targets() {
        print_target(target);
    }

    debug!("dry-run complete (no execution)");
}

fn print_target(target: &Target) {
    println!("  - {}", target.key());
    println!("      log: {}", target.log_path().display());
    for cmd in target.commands() {
        println!("      cmd: {cmd}");
    }
    let exclude = target.rules().exclude_patterns();
    if !exclude.is_empty() {
        println!("      exclude: {:?}", exclude);
    }
    let include = target.rules().include_patterns();
    if !include.is_empty() {
        println!("      include: {:?}", include);
    }
}
