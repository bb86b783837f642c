// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The free-form plan document beside the task list.
//!
//! Read and overwritten in whole; each write leaves a timestamped backup
//! so an agent or user can recover an overwritten plan.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use nv_core::{Clock, SystemClock};

use crate::backup::create_backup;

/// Whole-file access to `<repo>/plan/plan.md`.
#[derive(Clone)]
pub struct PlanDoc {
    path: PathBuf,
}

impl PlanDoc {
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        Self { path: repo_root.as_ref().join(nv_core::repo::PLAN_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the document, or an empty string before the first write.
    pub fn read(&self) -> io::Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Replace the document, backing up the previous version beside it.
    pub fn write(&self, content: &str) -> io::Result<()> {
        if let Err(e) = create_backup(&self.path, SystemClock.epoch_secs()) {
            warn!(path = %self.path.display(), error = %e, "plan backup failed");
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
