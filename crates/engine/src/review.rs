// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The human review gate: merge or discard a task branch.

use tracing::{info, warn};

use nv_adapters::git;
use nv_core::{Clock, Task, TaskStatus};

use crate::engine::Engine;
use crate::error::EngineError;

/// Prefix a rejected task's title carries forever.
const REJECT_MARKER: &str = "NOT MERGED: ";

impl<C: Clock> Engine<C> {
    /// Merge the task branch into the mainline and close the task.
    ///
    /// Ordering is load-bearing: the branch is only deleted after the
    /// merge succeeds, and the status write comes last. A failure after
    /// the merge reports partial success rather than pretending the
    /// merge did not happen.
    pub async fn approve(&self, task_id: u64) -> Result<Task, EngineError> {
        let task = self.get_task(task_id)?;
        if task.status != TaskStatus::PendingReview {
            return Err(EngineError::NotPendingReview { id: task_id, status: task.status });
        }

        let repo = &self.config.repo_root;
        let branch = task.branch_name();
        if !git::branch_exists(repo, &branch).await? {
            return Err(EngineError::BranchNotFound { branch });
        }

        let message = format!("Merge task #{}: {}", task.id, task.title);
        git::merge_no_ff(repo, &branch, &message).await?;
        info!(task_id, branch = %branch, "task branch merged");

        if let Err(e) = git::delete_branch(repo, &branch, false).await {
            return Err(EngineError::PartialApprove {
                task_id,
                detail: format!("branch delete failed: {e}"),
            });
        }
        match self.store.move_status(task_id, TaskStatus::Done) {
            Ok(task) => Ok(task),
            Err(e) => Err(EngineError::PartialApprove {
                task_id,
                detail: format!("status not recorded: {e}"),
            }),
        }
    }

    /// Discard the task branch and close the task as not merged.
    ///
    /// Branch deletion is best-effort: the end state the user asked for
    /// is "this work is discarded", and a delete failure must not keep
    /// the task open. Idempotent: rejecting an already-rejected task is
    /// a no-op.
    pub async fn reject(&self, task_id: u64) -> Result<Task, EngineError> {
        let mut task = self.get_task(task_id)?;
        if task.status == TaskStatus::Done && task.title.starts_with(REJECT_MARKER) {
            return Ok(task);
        }
        if task.status != TaskStatus::PendingReview {
            return Err(EngineError::NotPendingReview { id: task_id, status: task.status });
        }

        let branch = task.branch_name();
        if let Err(e) = git::delete_branch(&self.config.repo_root, &branch, true).await {
            warn!(task_id, branch = %branch, error = %e, "task branch delete failed on reject");
        }

        if !task.title.starts_with(REJECT_MARKER) {
            task.title = format!("{REJECT_MARKER}{}", task.title);
        }
        task.status = TaskStatus::Done;
        self.store.update(task.clone())?;
        info!(task_id, "task rejected");
        Ok(task)
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
