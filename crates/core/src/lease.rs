// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worktree lease records.
//!
//! A lease is a small `key=value` text file co-located with its workspace
//! (`<workspace>/.agent_state`). Presence means the workspace is busy;
//! absence means it is idle. All lease discovery scans workspaces rather
//! than consulting a central table, so a crashed supervisor leaves nothing
//! to reconcile beyond the files themselves.

use std::fmt;

/// File name of the lease record inside a workspace.
pub const LEASE_FILE: &str = ".agent_state";

/// An exclusive claim on one pooled workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    /// Workspace index (the `N` in `<repo>-worker<N>`), 1-based.
    pub worker: u32,
    /// Pid of the agent subprocess serving the task.
    pub pid: u32,
    pub task_id: u64,
    pub task_title: String,
    /// Epoch seconds at acquisition.
    pub started: u64,
    /// Human-readable form of `started`, for people inspecting the file.
    pub started_human: String,
    /// Absolute path of the workspace the lease lives in.
    pub worktree: String,
}

impl Lease {
    /// Seconds elapsed since acquisition. Clamps to zero if the clock
    /// moved backwards.
    pub fn age_secs(&self, now_epoch: u64) -> u64 {
        now_epoch.saturating_sub(self.started)
    }

    /// Serialize to the on-disk `key=value` record.
    pub fn to_record(&self) -> String {
        format!(
            "status=running\n\
             pid={}\n\
             task_id={}\n\
             task_title={}\n\
             started={}\n\
             started_human={}\n\
             worktree={}\n",
            self.pid, self.task_id, self.task_title, self.started, self.started_human,
            self.worktree,
        )
    }

    /// Parse a lease record. Unknown keys are ignored so older supervisors
    /// can read records written by newer ones.
    pub fn parse(worker: u32, content: &str) -> Result<Self, LeaseParseError> {
        let mut pid = None;
        let mut task_id = None;
        let mut task_title = None;
        let mut started = None;
        let mut started_human = None;
        let mut worktree = None;

        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(LeaseParseError::Malformed { line: line.to_string() });
            };
            match key {
                "pid" => pid = Some(parse_u32("pid", value)?),
                "task_id" => task_id = Some(parse_u64("task_id", value)?),
                "task_title" => task_title = Some(value.to_string()),
                "started" => started = Some(parse_u64("started", value)?),
                "started_human" => started_human = Some(value.to_string()),
                "worktree" => worktree = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(Lease {
            worker,
            pid: pid.ok_or(LeaseParseError::MissingKey { key: "pid" })?,
            task_id: task_id.ok_or(LeaseParseError::MissingKey { key: "task_id" })?,
            task_title: task_title.unwrap_or_default(),
            started: started.ok_or(LeaseParseError::MissingKey { key: "started" })?,
            started_human: started_human.unwrap_or_default(),
            worktree: worktree.unwrap_or_default(),
        })
    }
}

impl fmt::Display for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worker{} pid={} task={} ({})",
            self.worker, self.pid, self.task_id, self.task_title
        )
    }
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, LeaseParseError> {
    value.parse().map_err(|_| LeaseParseError::BadNumber { key, value: value.to_string() })
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, LeaseParseError> {
    value.parse().map_err(|_| LeaseParseError::BadNumber { key, value: value.to_string() })
}

/// Errors from [`Lease::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaseParseError {
    #[error("lease record line is not key=value: {line:?}")]
    Malformed { line: String },

    #[error("lease record missing key {key:?}")]
    MissingKey { key: &'static str },

    #[error("lease record key {key:?} has non-numeric value {value:?}")]
    BadNumber { key: &'static str, value: String },
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
