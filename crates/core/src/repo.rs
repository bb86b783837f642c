// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository registry records for the configuration collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One registered repository the supervisor can be pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub added_at: DateTime<Utc>,
}

impl RepoRecord {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = repo_name(&path);
        Self { id: id.into(), name, path, added_at: Utc::now() }
    }
}

/// Directory base name, used both for display and for deriving the
/// `<repo-name>-worker<N>` workspace naming convention.
pub fn repo_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Relative location of the task list inside a repository.
pub const TASK_FILE: &str = "plan/task.json";

/// Relative location of the plan document inside a repository.
pub const PLAN_FILE: &str = "plan/plan.md";

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
