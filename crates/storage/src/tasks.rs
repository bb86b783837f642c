// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task store: canonical owner of `plan/task.json`.
//!
//! Write protocol (spec: one writer, many readers, no torn reads):
//! 1. timestamped backup of the current file (best effort),
//! 2. marshal to a uniquely named temp file in the same directory,
//! 3. fsync the temp file,
//! 4. rename into place.
//! Failures after step 2 remove the temp file and attempt a rollback
//! from the backup. Writers hold an exclusive advisory lock on a sidecar
//! lock file; readers hold a shared one.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::warn;

use nv_core::{validate_tasks, Clock, ErrorKind, SystemClock, Task, TaskStatus, ValidationError};

use crate::backup::create_backup;

/// Errors surfaced by [`TaskStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task {id} not found")]
    NotFound { id: u64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("task file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::Io(_) | StoreError::Json(_) => ErrorKind::External,
        }
    }
}

/// Atomic, validated access to the task list file.
#[derive(Clone)]
pub struct TaskStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl TaskStore {
    /// Store for `<repo_root>/plan/task.json`.
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        let path = repo_root.as_ref().join(nv_core::repo::TASK_FILE);
        let lock_path = path.with_file_name(".task.json.lock");
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a snapshot. Creates an empty list atomically if the file is
    /// missing (first run against a fresh repository).
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            let _guard = FileLock::exclusive(&self.lock_path)?;
            // Re-check under the lock; another writer may have won.
            if !self.path.exists() {
                self.persist_locked(&[], false)?;
            }
        }
        let _guard = FileLock::shared(&self.lock_path)?;
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Validate and atomically replace the whole list.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        validate_tasks(tasks)?;
        let _guard = FileLock::exclusive(&self.lock_path)?;
        self.persist_locked(tasks, true)
    }

    /// Replace the task with a matching id.
    pub fn update(&self, task: Task) -> Result<(), StoreError> {
        let _guard = FileLock::exclusive(&self.lock_path)?;
        let mut tasks = self.read_locked()?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(StoreError::NotFound { id: task.id })?;
        *slot = task;
        validate_tasks(&tasks)?;
        self.persist_locked(&tasks, true)
    }

    /// Mutate only the status field of one task. Returns the updated task.
    pub fn move_status(&self, id: u64, status: TaskStatus) -> Result<Task, StoreError> {
        let _guard = FileLock::exclusive(&self.lock_path)?;
        let mut tasks = self.read_locked()?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound { id })?;
        slot.status = status;
        let updated = slot.clone();
        self.persist_locked(&tasks, true)?;
        Ok(updated)
    }

    /// Snapshot filter by status.
    pub fn filter_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.load()?;
        tasks.retain(|t| t.status == status);
        Ok(tasks)
    }

    /// Read without taking the lock; caller must hold it.
    fn read_locked(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Steps 1–4 of the write protocol; caller must hold the exclusive lock.
    fn persist_locked(&self, tasks: &[Task], with_backup: bool) -> Result<(), StoreError> {
        let epoch = SystemClock.epoch_secs();

        // A failed backup is logged but never blocks the write.
        let backup = if with_backup {
            match create_backup(&self.path, epoch) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "task file backup failed");
                    None
                }
            }
        } else {
            None
        };

        // Two-space pretty printing keeps the file human-diffable.
        let mut payload = serde_json::to_string_pretty(tasks)?;
        payload.push('\n');

        let tmp = self.temp_path(epoch);
        if let Err(e) = write_synced(&tmp, payload.as_bytes()).and_then(|()| {
            std::fs::rename(&tmp, &self.path)
        }) {
            let _ = std::fs::remove_file(&tmp);
            if let Some(backup) = backup {
                if std::fs::rename(&backup, &self.path).is_ok() {
                    warn!(path = %self.path.display(), "task file rolled back from backup");
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self, epoch: u64) -> PathBuf {
        let name = format!(".task.json.{}.{}.tmp", epoch, std::process::id());
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Advisory lock held for the lifetime of the guard.
struct FileLock {
    file: File,
}

impl FileLock {
    fn exclusive(path: &Path) -> io::Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    fn shared(path: &Path) -> io::Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_shared()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).truncate(false).read(true).write(true).open(path)
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
