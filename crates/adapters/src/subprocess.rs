// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout-scoped subprocess execution.
//!
//! Every external command in the daemon runs through [`run_with_timeout`]:
//! the child is killed when the timeout elapses or the calling future is
//! dropped, so no git or agent process outlives its scope.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

/// Generous bound for plain git commands (status, branch, merge).
pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Worktree add/remove touch many files; give them longer.
pub const GIT_WORKTREE_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    #[error("{label}: failed to spawn: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: I/O error: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: timed out after {secs}s")]
    Timeout { label: String, secs: u64 },
}

/// Run a command to completion, capturing stdout/stderr, killing the
/// child if `timeout` elapses first. `label` names the operation in
/// errors and logs.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, SubprocessError> {
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|source| SubprocessError::Spawn { label: label.to_string(), source })?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SubprocessError::Io { label: label.to_string(), source }),
        // kill_on_drop reaps the child when the output future is dropped.
        Err(_) => Err(SubprocessError::Timeout { label: label.to_string(), secs: timeout.as_secs() }),
    }
}

/// Combined stdout+stderr of an [`Output`], lossily decoded for logs.
pub fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
