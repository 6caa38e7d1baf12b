// src/exec/pipeline.rs

//! Sequential execution of a target's command list.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{PollwatchError, Result};
use crate::exec::command::CommandLine;
use crate::logging::TargetLog;
use crate::target::Target;

/// Run every command of `target` in order with the target root as working
/// directory.
///
/// Stdout and stderr of each command are appended to `log`. The first command
/// that fails to start or exits non-zero stops the pipeline; later commands
/// are never spawned.
pub async fn run_pipeline(target: &Target, filename: &str, log: &TargetLog) -> Result<()> {
    info!(
        root = %target.key(),
        file = %filename,
        commands = target.commands().len(),
        "running action pipeline"
    );

    for raw in target.commands() {
        if let Err(err) = run_command(target, raw, log).await {
            warn!(root = %target.key(), command = %raw, error = %err, "action pipeline aborted");
            log.line(err.to_string());
            return Err(err);
        }
    }

    info!(root = %target.key(), file = %filename, "action pipeline finished");
    Ok(())
}

async fn run_command(target: &Target, raw: &str, log: &TargetLog) -> Result<()> {
    let line = CommandLine::parse(raw).ok_or_else(|| PollwatchError::CommandFailed {
        command: raw.to_string(),
        reason: "empty command".to_string(),
    })?;

    debug!(program = %line.program, args = ?line.args, cwd = ?target.root(), "spawning command");

    let output = Command::new(&line.program)
        .args(&line.args)
        .current_dir(target.root())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| PollwatchError::CommandFailed {
            command: raw.to_string(),
            reason: format!("failed to start: {e}"),
        })?;

    log.output(&output.stdout);
    log.output(&output.stderr);

    let code = output.status.code();
    debug!(command = %raw, exit_code = ?code, success = output.status.success(), "command exited");

    if output.status.success() {
        return Ok(());
    }

    let reason = match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };
    Err(PollwatchError::CommandFailed {
        command: raw.to_string(),
        reason,
    })
}
