// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use nv_core::Task;
use serde::{Deserialize, Serialize};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Snapshot of the task list
    ListTasks,

    /// Replace the whole task list
    SaveTasks { tasks: Vec<Task> },

    /// Replace one task by id
    UpdateTask { task: Task },

    /// Change one task's status, dispatching side effects.
    /// The status travels as text so the daemon owns validation.
    MoveTask { id: u64, status: String },

    /// Merge the task branch and close the task
    ApproveTask { id: u64 },

    /// Discard the task branch and close the task
    RejectTask { id: u64 },

    /// Worktree pool summary
    PoolStatus,

    /// Read the plan document
    ReadPlan,

    /// Overwrite the plan document
    WritePlan { content: String },

    /// Allocate a terminal session id
    OpenTerminal,

    /// Upgrade this connection into a terminal byte stream.
    /// `origin` is the declared origin for network clients; local
    /// socket clients leave it out.
    AttachTerminal {
        session_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },

    /// The currently active repository
    ActiveRepository,

    /// Switch the active repository (rebuilds the engine)
    SwitchRepository { id: String },

    /// All registered repositories
    ListRepositories,

    /// Register a repository by path
    AddRepository { path: PathBuf },

    /// Remove a repository from the registry
    RemoveRepository { id: String },

    /// Check whether a path is a usable repository
    ValidateRepository { path: PathBuf },

    /// Daemon status summary
    Status,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
