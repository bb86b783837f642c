// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task records and list validation.
//!
//! Tasks reference each other by id (`deps`, `parent`), never by pointer.
//! The task list is the unit of persistence; [`validate_tasks`] must pass
//! before any write reaches disk.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    Todo,
    Doing,
    PendingReview,
    Done,
}

impl TaskStatus {
    /// Terminal means nothing happens to the task without explicit user action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::PendingReview => "pending_review",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(TaskStatus::Backlog),
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "pending_review" => Ok(TaskStatus::PendingReview),
            "done" => Ok(TaskStatus::Done),
            other => Err(ValidationError::UnknownStatus { status: other.to_string() }),
        }
    }
}

/// Scheduling hint surfaced to the user; the engine does not order by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::High => f.write_str("high"),
            TaskPriority::Medium => f.write_str("medium"),
            TaskPriority::Low => f.write_str("low"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            other => Err(ValidationError::UnknownPriority { priority: other.to_string() }),
        }
    }
}

/// One entry in the task list file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub deps: Vec<u64>,
    #[serde(default)]
    pub parent: Option<u64>,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: TaskStatus::Backlog,
            priority: TaskPriority::Medium,
            deps: Vec::new(),
            parent: None,
        }
    }

    /// The branch the spawner creates for this task's agent run.
    pub fn branch_name(&self) -> String {
        format!("task_{}", self.id)
    }
}

/// Rejections produced by [`validate_tasks`] and the status/priority parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task {id} has an empty title")]
    EmptyTitle { id: u64 },

    #[error("duplicate task id {id}")]
    DuplicateId { id: u64 },

    #[error("task {id} depends on unknown task {dep}")]
    UnknownDependency { id: u64, dep: u64 },

    #[error("task {id} has unknown parent {parent}")]
    UnknownParent { id: u64, parent: u64 },

    #[error("task {id} is part of a parent cycle")]
    ParentCycle { id: u64 },

    #[error("unknown status: {status}")]
    UnknownStatus { status: String },

    #[error("unknown priority: {priority}")]
    UnknownPriority { priority: String },
}

/// Validate a full task list before it is written.
///
/// Checks: non-empty titles, unique ids, every `deps`/`parent` referent
/// exists, and the `parent` relation is acyclic.
pub fn validate_tasks(tasks: &[Task]) -> Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle { id: task.id });
        }
        if !ids.insert(task.id) {
            return Err(ValidationError::DuplicateId { id: task.id });
        }
    }

    for task in tasks {
        for dep in &task.deps {
            if !ids.contains(dep) {
                return Err(ValidationError::UnknownDependency { id: task.id, dep: *dep });
            }
        }
        if let Some(parent) = task.parent {
            if !ids.contains(&parent) {
                return Err(ValidationError::UnknownParent { id: task.id, parent });
            }
        }
    }

    // Parent chains must terminate. Walk each chain; revisiting a node
    // within one walk means a cycle.
    for task in tasks {
        let mut seen = HashSet::new();
        let mut current = task.parent;
        seen.insert(task.id);
        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                return Err(ValidationError::ParentCycle { id: task.id });
            }
            current = tasks.iter().find(|t| t.id == parent_id).and_then(|t| t.parent);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
