// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-only summary types.

use serde::{Deserialize, Serialize};

/// One registered repository as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: String,
    pub name: String,
    pub path: String,
    pub active: bool,
}

/// Daemon status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub version: String,
    pub uptime_secs: u64,
    /// Busy workspaces in the active repository's pool.
    pub busy_workers: u32,
    pub terminal_sessions: usize,
    /// Active repository id, if one is configured.
    pub repo: Option<String>,
}

/// Messages on an upgraded terminal connection.
///
/// `history` frames replay the scrollback, one per buffered line, before
/// any `output` frame; `input` flows client → daemon only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TermFrame {
    Input { data: String },
    Output { data: String },
    History { line: String },
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
