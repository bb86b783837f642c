// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent launch flow (lease → prompt → subprocess → cleanup).

use std::path::PathBuf;

use tracing::{error, info, warn};

use nv_adapters::{AgentExit, AgentLaunch, AgentSpawnSpec};
use nv_core::{Clock, Task, TaskStatus};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::prompt::build_prompt;
use crate::sanitize::{sanitize_title, validate_agent_cmd, validate_project_root};

/// PATH handed to the agent: system binaries only.
const AGENT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

impl<C: Clock> Engine<C> {
    /// Run one agent to completion on a leased workspace.
    ///
    /// Validation failures happen before any lease is taken. After the
    /// agent exits — however it exits — the workspace is detached from
    /// the task branch and the lease is released.
    pub async fn launch_agent(&self, task: &Task) -> Result<(), EngineError> {
        validate_project_root(&self.config.repo_root, &self.config.allowed_roots)?;
        validate_agent_cmd(&self.config.agent_cmd)?;
        let title = sanitize_title(&task.title);

        let mut lease = self.pool.acquire(task.id, &title).await?;
        let workspace = PathBuf::from(&lease.worktree);
        let guard = LeaseGuard::new(workspace.clone(), task.id);
        info!(task_id = task.id, worker = lease.worker, "agent workspace leased");

        let spec = AgentSpawnSpec {
            program: self.config.agent_cmd.clone(),
            prompt: build_prompt(task.id, &title, &self.config.repo_root),
            workdir: workspace.clone(),
            env: restricted_env(task.id, &title),
            accept_timeout: self.config.accept_timeout,
        };

        let exit = match self.agent.launch(spec).await {
            Ok(AgentLaunch::Completed { exit }) => exit,
            Ok(AgentLaunch::Running { pid, exit }) => {
                if let Err(e) = self.pool.adopt_pid(&mut lease, pid) {
                    warn!(task_id = task.id, error = %e, "failed to restamp lease pid");
                }
                match exit.await {
                    Ok(exit) => exit,
                    Err(_) => AgentExit { code: None, output: "agent monitor dropped".into() },
                }
            }
            Err(e) => {
                self.finish_lease(guard, &lease).await;
                return Err(e.into());
            }
        };

        self.finish_lease(guard, &lease).await;

        if exit.success() {
            info!(task_id = task.id, "agent exited cleanly");
            self.notify_if_review_ready(task.id);
            Ok(())
        } else {
            error!(
                task_id = task.id,
                code = ?exit.code,
                output = %exit.output,
                "agent failed; task stays as-is for the user to reject"
            );
            Err(EngineError::AgentFailed { task_id: task.id, code: exit.code })
        }
    }

    /// Detach the workspace from the task branch and release the lease.
    /// Both steps are best-effort: the guard already guarantees the
    /// lease record cannot outlive this call.
    async fn finish_lease(&self, guard: LeaseGuard, lease: &nv_core::Lease) {
        let workspace = guard.disarm();
        if let Err(e) = nv_pool::detach(&workspace).await {
            warn!(worker = lease.worker, error = %e, "failed to detach workspace");
        }
        if let Err(e) = self.pool.release(lease).await {
            warn!(worker = lease.worker, error = %e, "failed to release lease");
        }
    }

    /// The cross-branch convention means the agent, not the engine,
    /// flips the status; peek at the store and tell the user if the
    /// task is now waiting on them.
    fn notify_if_review_ready(&self, task_id: u64) {
        match self.store.load() {
            Ok(tasks) => {
                if let Some(task) =
                    tasks.iter().find(|t| t.id == task_id && t.status == TaskStatus::PendingReview)
                {
                    self.notifier.notify(
                        "Task ready for review",
                        &format!("#{} {}", task.id, task.title),
                    );
                }
            }
            Err(e) => warn!(task_id, error = %e, "could not check review status"),
        }
    }
}

fn restricted_env(task_id: u64, title: &str) -> Vec<(String, String)> {
    let mut env = vec![("PATH".to_string(), AGENT_PATH.to_string())];
    for key in ["HOME", "USER"] {
        if let Ok(value) = std::env::var(key) {
            env.push((key.to_string(), value));
        }
    }
    env.push(("NV_TASK_ID".to_string(), task_id.to_string()));
    env.push(("NV_TASK_TITLE".to_string(), title.to_string()));
    env
}

/// Releases the lease record on drop unless disarmed; the backstop for
/// panics anywhere in the launch flow.
struct LeaseGuard {
    workspace: PathBuf,
    task_id: u64,
    armed: bool,
}

impl LeaseGuard {
    fn new(workspace: PathBuf, task_id: u64) -> Self {
        Self { workspace, task_id, armed: true }
    }

    fn disarm(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.workspace)
    }
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(task_id = self.task_id, "lease released by guard after abnormal exit");
            if let Err(e) = nv_pool::remove_lease(&self.workspace) {
                error!(task_id = self.task_id, error = %e, "guard failed to remove lease");
            }
        }
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
