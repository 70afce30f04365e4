// src/exec/command.rs

//! `exec` action: spawn a process and require a zero exit status.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, SchedwatchError};

/// Run `program` with `args`, capturing stdout and stderr.
///
/// The process is not run through a shell. On failure the captured output
/// (stdout followed by stderr) is attached to the error. With a `timeout`,
/// the child is killed once it elapses.
pub async fn run_command(program: &str, args: &[String], timeout: Option<Duration>) -> Result<()> {
    info!(cmd = %program, ?args, "starting process");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(res) => res,
            Err(_) => {
                return Err(SchedwatchError::ActionExec {
                    reason: format!("timed out after {limit:?}"),
                    output: String::new(),
                });
            }
        },
        None => cmd.output().await,
    };

    let output = output.map_err(|e| SchedwatchError::ActionExec {
        reason: format!("spawning '{program}': {e}"),
        output: String::new(),
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    debug!(
        cmd = %program,
        exit_code = output.status.code().unwrap_or(-1),
        success = output.status.success(),
        "process exited"
    );

    if !output.status.success() {
        return Err(SchedwatchError::ActionExec {
            reason: output.status.to_string(),
            output: combined,
        });
    }

    Ok(())
}
