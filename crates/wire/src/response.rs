// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nv_core::{ErrorKind, Task};
use nv_pool::PoolStatus;
use serde::{Deserialize, Serialize};

use super::types::{RepoSummary, StatusSummary};

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Task list snapshot
    Tasks { tasks: Vec<Task> },

    /// A single (moved/updated) task
    Task { task: Task },

    /// Worktree pool summary
    Pool { status: PoolStatus },

    /// Plan document content
    Plan { content: String },

    /// A fresh terminal session id
    TerminalOpened { session_id: String },

    /// The connection now carries TermFrame messages
    TerminalAttachReady { session_id: String },

    /// Registered repositories
    Repositories { repos: Vec<RepoSummary> },

    /// One repository (active, added, or switched-to)
    Repository { repo: Option<RepoSummary> },

    /// Result of a repository validation probe
    RepoValidation { valid: bool, task_count: usize },

    /// Daemon status
    Status { status: StatusSummary },

    /// Daemon is shutting down
    ShuttingDown,

    /// Typed failure
    Error { kind: ErrorKind, message: String },
}

impl Response {
    /// Shorthand for error responses.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Response::Error { kind, message: message.into() }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
