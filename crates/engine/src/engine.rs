// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: one repository session's store, pool, and adapters.
//!
//! Process-wide, rebuilt on repository switch. Terminal sessions live
//! elsewhere (nv-term) precisely so they survive the rebuild.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nv_adapters::{AgentAdapter, NotifyAdapter};
use nv_core::{Clock, Task};
use nv_pool::{PoolConfig, PoolStatus, WorktreePool};
use nv_storage::{PlanDoc, TaskStore};

use crate::error::EngineError;

/// Acceptance-window default: how long a spawn may block waiting for
/// the agent to take the invocation.
pub const DEFAULT_ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine configuration, fixed per repository session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub repo_root: PathBuf,
    /// The external coding-agent executable.
    pub agent_cmd: PathBuf,
    /// Directories a project root may resolve under; empty = no fence.
    pub allowed_roots: Vec<PathBuf>,
    pub max_workers: u32,
    pub max_lease_age: Duration,
    pub accept_timeout: Duration,
}

impl EngineConfig {
    pub fn new(repo_root: impl Into<PathBuf>, agent_cmd: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            agent_cmd: agent_cmd.into(),
            allowed_roots: Vec::new(),
            max_workers: nv_pool::DEFAULT_MAX_WORKERS,
            max_lease_age: nv_pool::DEFAULT_LEASE_MAX_AGE,
            accept_timeout: DEFAULT_ACCEPT_TIMEOUT,
        }
    }
}

/// Control plane for one repository.
#[derive(Clone)]
pub struct Engine<C: Clock> {
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) store: TaskStore,
    pub(crate) plan: PlanDoc,
    pub(crate) pool: Arc<WorktreePool<C>>,
    pub(crate) agent: Arc<dyn AgentAdapter>,
    pub(crate) notifier: Arc<dyn NotifyAdapter>,
}

impl<C: Clock> Engine<C> {
    pub fn new(
        config: EngineConfig,
        agent: Arc<dyn AgentAdapter>,
        notifier: Arc<dyn NotifyAdapter>,
        clock: C,
    ) -> Self {
        let pool_config = PoolConfig {
            repo_root: config.repo_root.clone(),
            max_workers: config.max_workers,
            max_lease_age: config.max_lease_age,
        };
        Self {
            store: TaskStore::new(&config.repo_root),
            plan: PlanDoc::new(&config.repo_root),
            pool: Arc::new(WorktreePool::new(pool_config, clock)),
            config: Arc::new(config),
            agent,
            notifier,
        }
    }

    pub fn repo_root(&self) -> &std::path::Path {
        &self.config.repo_root
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn pool(&self) -> &WorktreePool<C> {
        &self.pool
    }

    // ---- facade passthroughs ----

    pub fn list_tasks(&self) -> Result<Vec<Task>, EngineError> {
        Ok(self.store.load()?)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), EngineError> {
        Ok(self.store.save(tasks)?)
    }

    pub fn update_task(&self, task: Task) -> Result<(), EngineError> {
        Ok(self.store.update(task)?)
    }

    pub fn pool_status(&self) -> Result<PoolStatus, EngineError> {
        Ok(self.pool.status()?)
    }

    pub fn read_plan(&self) -> Result<String, EngineError> {
        self.plan.read().map_err(|e| EngineError::Store(e.into()))
    }

    pub fn write_plan(&self, content: &str) -> Result<(), EngineError> {
        self.plan.write(content).map_err(|e| EngineError::Store(e.into()))
    }

    /// Registry hygiene, driven by the daemon's maintenance interval.
    pub async fn maintain(&self) -> Result<(), EngineError> {
        Ok(self.pool.maintain().await?)
    }

    pub(crate) fn get_task(&self, id: u64) -> Result<Task, EngineError> {
        self.store
            .load()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(EngineError::TaskNotFound { id })
    }
}
