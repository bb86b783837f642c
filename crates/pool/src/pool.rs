// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease allocation and stale reclamation.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use nv_adapters::git;
use nv_core::{time_fmt, Clock, ErrorKind, Lease};

use crate::discover::{self, WorkspaceScan};
use crate::lease_file::{self, LeaseRead};
use crate::status::{PoolStatus, WorkerState, WorkerStatus};
use crate::{prepare, write_lease};

pub const DEFAULT_MAX_WORKERS: u32 = 2;
pub const DEFAULT_LEASE_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Pool configuration, fixed for the lifetime of a repository session.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub repo_root: PathBuf,
    pub max_workers: u32,
    pub max_lease_age: Duration,
}

impl PoolConfig {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            max_workers: DEFAULT_MAX_WORKERS,
            max_lease_age: DEFAULT_LEASE_MAX_AGE,
        }
    }
}

/// Errors from pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("all {max} workspaces are busy")]
    PoolFull { max: u32 },

    #[error(transparent)]
    Git(#[from] nv_adapters::GitError),

    #[error("workspace I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PoolError::PoolFull { .. } => ErrorKind::Conflict,
            PoolError::Git(e) => e.kind(),
            PoolError::Io(_) => ErrorKind::External,
        }
    }
}

/// The bounded pool of reusable workspaces.
///
/// All allocation state lives in the workspaces themselves (the lease
/// files); the pool is just the policy plus the lock that serializes
/// allocation with stale reclamation.
pub struct WorktreePool<C: Clock> {
    config: PoolConfig,
    clock: C,
    alloc: Mutex<()>,
}

impl<C: Clock> WorktreePool<C> {
    pub fn new(config: PoolConfig, clock: C) -> Self {
        Self { config, clock, alloc: Mutex::new(()) }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Lease an idle workspace for a task, reclaiming stale leases and
    /// growing the pool up to capacity. The workspace comes back clean,
    /// detached at the mainline revision, on branch `task_<id>`.
    pub async fn acquire(&self, task_id: u64, task_title: &str) -> Result<Lease, PoolError> {
        let _guard = self.alloc.lock().await;

        let now = self.clock.epoch_secs();
        let slots = discover::scan(&self.config.repo_root, self.config.max_workers)?;

        let mut idle: Option<&WorkspaceScan> = None;
        let mut unprovisioned: Option<&WorkspaceScan> = None;
        for slot in &slots {
            if !slot.exists {
                if unprovisioned.is_none() {
                    unprovisioned = Some(slot);
                }
                continue;
            }
            let reclaim = match &slot.lease {
                LeaseRead::Idle => None,
                LeaseRead::Busy(lease) => match self.stale_reason(lease, now) {
                    Some(reason) => Some(reason),
                    None => continue, // healthy lease, slot is busy
                },
                LeaseRead::Corrupt { error } => Some(format!("corrupt lease: {error}")),
            };
            if let Some(reason) = reclaim {
                info!(worker = slot.index, reason = %reason, "reclaiming stale lease");
                lease_file::remove_lease(&slot.path)?;
            }
            if idle.is_none() {
                idle = Some(slot);
            }
        }

        // Smallest existing idle index wins; grow only when nothing idle.
        let (index, path) = match idle.or(unprovisioned) {
            Some(slot) if slot.exists => (slot.index, slot.path.clone()),
            Some(slot) => {
                info!(worker = slot.index, path = %slot.path.display(), "creating workspace");
                git::worktree_add_detached(&self.config.repo_root, &slot.path).await?;
                (slot.index, slot.path.clone())
            }
            None => return Err(PoolError::PoolFull { max: self.config.max_workers }),
        };

        let mainline_rev = git::rev_parse(&self.config.repo_root, "HEAD").await?;
        let branch = format!("task_{task_id}");
        prepare::prepare(&path, &mainline_rev, &branch).await?;

        let lease = Lease {
            worker: index,
            pid: std::process::id(),
            task_id,
            task_title: task_title.to_string(),
            started: now,
            started_human: time_fmt::human_timestamp(now),
            worktree: path.display().to_string(),
        };
        write_lease(&path, &lease)?;
        Ok(lease)
    }

    /// Re-stamp a lease with the agent subprocess pid once it is known,
    /// so liveness probes track the agent rather than the supervisor.
    pub fn adopt_pid(&self, lease: &mut Lease, pid: u32) -> Result<(), PoolError> {
        lease.pid = pid;
        write_lease(lease.worktree.as_ref(), lease)?;
        Ok(())
    }

    /// Drop the lease record. The workspace stays for reuse.
    pub async fn release(&self, lease: &Lease) -> Result<(), PoolError> {
        let _guard = self.alloc.lock().await;
        lease_file::remove_lease(lease.worktree.as_ref())?;
        Ok(())
    }

    /// Read-only snapshot; performs no reclamation.
    pub fn status(&self) -> Result<PoolStatus, PoolError> {
        let now = self.clock.epoch_secs();
        let slots = discover::scan(&self.config.repo_root, self.config.max_workers)?;

        let mut workers = Vec::with_capacity(slots.len());
        let (mut existing, mut idle, mut busy) = (0, 0, 0);
        for slot in &slots {
            let state = if !slot.exists {
                WorkerState::Unprovisioned
            } else {
                existing += 1;
                match &slot.lease {
                    LeaseRead::Idle => {
                        idle += 1;
                        WorkerState::Idle
                    }
                    LeaseRead::Corrupt { error } => {
                        idle += 1;
                        WorkerState::Stale { reason: format!("corrupt lease: {error}") }
                    }
                    LeaseRead::Busy(lease) => match self.stale_reason(lease, now) {
                        Some(reason) => {
                            idle += 1;
                            WorkerState::Stale { reason }
                        }
                        None => {
                            busy += 1;
                            WorkerState::Busy {
                                task_id: lease.task_id,
                                task_title: lease.task_title.clone(),
                                pid: lease.pid,
                                age_secs: lease.age_secs(now),
                            }
                        }
                    },
                }
            };
            workers.push(WorkerStatus {
                index: slot.index,
                path: slot.path.display().to_string(),
                state,
            });
        }

        Ok(PoolStatus {
            max_workers: self.config.max_workers,
            existing,
            idle,
            busy,
            workers,
        })
    }

    /// Registry hygiene, run periodically: drop git worktree entries
    /// whose directories are gone.
    pub async fn maintain(&self) -> Result<(), PoolError> {
        if let Err(e) = git::worktree_prune(&self.config.repo_root).await {
            warn!(error = %e, "worktree prune failed");
        }
        Ok(())
    }

    fn stale_reason(&self, lease: &Lease, now: u64) -> Option<String> {
        if !pid_alive(lease.pid) {
            return Some(format!("owning process {} is gone", lease.pid));
        }
        if lease.age_secs(now) > self.config.max_lease_age.as_secs() {
            return Some(format!(
                "lease age {} exceeds maximum {}",
                time_fmt::format_elapsed(lease.age_secs(now)),
                time_fmt::format_elapsed(self.config.max_lease_age.as_secs()),
            ));
        }
        None
    }
}

/// Signal-0 probe. EPERM means the pid exists but belongs to someone
/// else; that still counts as alive.
fn pid_alive(pid: u32) -> bool {
    match nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
