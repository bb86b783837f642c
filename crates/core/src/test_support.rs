// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders and fixtures shared across crates' tests.

use crate::{Lease, Task, TaskPriority, TaskStatus};

/// A well-formed task with the given id and status.
pub fn task(id: u64, status: TaskStatus) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        status,
        priority: TaskPriority::Medium,
        deps: Vec::new(),
        parent: None,
    }
}

/// A small mixed-status task list that passes validation.
pub fn task_board() -> Vec<Task> {
    vec![
        task(1, TaskStatus::Todo),
        task(2, TaskStatus::Backlog),
        task(3, TaskStatus::Doing),
        task(4, TaskStatus::PendingReview),
        task(5, TaskStatus::Done),
    ]
}

/// A lease for `worker` serving `task_id`, owned by this test process
/// (so liveness probes see it as alive).
pub fn live_lease(worker: u32, task_id: u64) -> Lease {
    Lease {
        worker,
        pid: std::process::id(),
        task_id,
        task_title: format!("Task {task_id}"),
        started: 1_700_000_000,
        started_human: "2023-11-14 22:13:20".into(),
        worktree: format!("/tmp/repo-worker{worker}"),
    }
}
