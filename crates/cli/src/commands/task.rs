// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv task` — board inspection and mutation.

use clap::Subcommand;

use nv_core::{Task, TaskPriority, TaskStatus};

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output;

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Show the board grouped by status
    List,
    /// Add a new task
    Add {
        title: String,
        /// Starting column (backlog or todo)
        #[arg(long, default_value = "backlog")]
        status: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Task ids this task depends on (repeatable)
        #[arg(long = "dep")]
        deps: Vec<u64>,
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Move a task to another column
    Move { id: u64, status: String },
    /// Rename a task
    Rename { id: u64, title: String },
    /// Delete a task
    Rm { id: u64 },
}

/// Next free id: max + 1, ids are never reused while their task exists.
pub(crate) fn next_task_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

fn parse_status(s: &str) -> Result<TaskStatus, ExitError> {
    s.parse().map_err(|e: nv_core::ValidationError| ExitError::new(2, e.to_string()))
}

fn parse_priority(s: &str) -> Result<TaskPriority, ExitError> {
    s.parse().map_err(|e: nv_core::ValidationError| ExitError::new(2, e.to_string()))
}

pub async fn run(command: TaskCommand) -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    match command {
        TaskCommand::List => {
            let tasks = client.list_tasks().await?;
            print!("{}", output::render_tasks(&tasks));
        }
        TaskCommand::Add { title, status, priority, deps, parent } => {
            let status = parse_status(&status)?;
            let priority = parse_priority(&priority)?;
            let mut tasks = client.list_tasks().await?;
            let id = next_task_id(&tasks);
            tasks.push(Task { id, title, status, priority, deps, parent });
            client.save_tasks(tasks).await?;
            println!("added task #{id}");
        }
        TaskCommand::Move { id, status } => {
            let task = client.move_task(id, &status).await?;
            println!("task #{} is now {}", task.id, task.status);
        }
        TaskCommand::Rename { id, title } => {
            let tasks = client.list_tasks().await?;
            let mut task = tasks
                .into_iter()
                .find(|t| t.id == id)
                .ok_or_else(|| ExitError::new(2, format!("task {id} not found")))?;
            task.title = title;
            client.update_task(task).await?;
            println!("renamed task #{id}");
        }
        TaskCommand::Rm { id } => {
            let mut tasks = client.list_tasks().await?;
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                return Err(ExitError::new(2, format!("task {id} not found")));
            }
            client.save_tasks(tasks).await?;
            println!("deleted task #{id}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
