// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent prompt construction.
//!
//! The prompt carries the whole working contract, including the
//! cross-branch convention: code lands on the task branch, but the
//! status flip to `pending_review` is written to the task list as seen
//! from the mainline checkout. That keeps the frequently-edited task
//! file out of every merge and lets the supervisor observe completion
//! without polling branches.

use std::path::Path;

/// Build the prompt for one task run.
///
/// `title` must already be sanitized; `mainline_root` is the primary
/// checkout whose `plan/task.json` the agent must edit for the status
/// flip.
pub fn build_prompt(task_id: u64, title: &str, mainline_root: &Path) -> String {
    let task_file = mainline_root.join(nv_core::repo::TASK_FILE);
    format!(
        "You are working on task #{task_id}: {title}\n\
         \n\
         1. Read plan/plan.md and plan/task.json in this workspace for \
         context on the project and this task.\n\
         2. Implement task #{task_id}. Work only inside this workspace.\n\
         3. Commit your changes to the current branch (task_{task_id}). \
         Do not switch branches, do not merge, do not push.\n\
         4. When the work is committed, update {task_file} (note: that \
         path is in the main checkout, not this workspace) so the task \
         with id {task_id} has \"status\": \"pending_review\". Change \
         nothing else in that file.\n\
         5. Exit when done.",
        task_file = task_file.display(),
    )
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
