// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering for command output.

use nv_core::Task;
use nv_wire::{PoolStatus, WorkerState};

/// Render the task board grouped by status column.
pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "no tasks\n".to_string();
    }
    let mut out = String::new();
    for status in ["backlog", "todo", "doing", "pending_review", "done"] {
        let column: Vec<&Task> =
            tasks.iter().filter(|t| t.status.as_str() == status).collect();
        if column.is_empty() {
            continue;
        }
        out.push_str(status);
        out.push('\n');
        for task in column {
            out.push_str(&format!("  #{:<4} [{}] {}\n", task.id, task.priority, task.title));
            if !task.deps.is_empty() {
                let deps: Vec<String> = task.deps.iter().map(|d| format!("#{d}")).collect();
                out.push_str(&format!("        deps: {}\n", deps.join(", ")));
            }
        }
    }
    out
}

/// Render the pool summary, one line per slot.
pub fn render_pool(status: &PoolStatus) -> String {
    let mut out = format!(
        "workers: {} of {} provisioned, {} busy, {} idle\n",
        status.existing, status.max_workers, status.busy, status.idle
    );
    for worker in &status.workers {
        let line = match &worker.state {
            WorkerState::Unprovisioned => format!("  worker{}: -\n", worker.index),
            WorkerState::Idle => format!("  worker{}: idle\n", worker.index),
            WorkerState::Busy { task_id, task_title, pid, age_secs } => format!(
                "  worker{}: task #{} ({}) pid {} for {}\n",
                worker.index,
                task_id,
                task_title,
                pid,
                nv_core::format_elapsed(*age_secs)
            ),
            WorkerState::Stale { reason } => {
                format!("  worker{}: stale ({reason})\n", worker.index)
            }
        };
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
