// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type, the union of everything the pipeline can hit.

use nv_core::{ErrorKind, TaskStatus};

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] nv_storage::StoreError),

    #[error(transparent)]
    Pool(#[from] nv_pool::PoolError),

    #[error(transparent)]
    Git(#[from] nv_adapters::GitError),

    #[error(transparent)]
    Agent(#[from] nv_adapters::AgentError),

    #[error("task {id} not found")]
    TaskNotFound { id: u64 },

    #[error("task {id} is {status}, expected pending_review")]
    NotPendingReview { id: u64, status: TaskStatus },

    #[error("branch {branch} not found")]
    BranchNotFound { branch: String },

    #[error("agent for task {task_id} exited with {code:?}")]
    AgentFailed { task_id: u64, code: Option<i32> },

    #[error("{message}")]
    Validation { message: String },

    /// The merge landed but a later step failed; the user sees exactly
    /// what is and is not recorded.
    #[error("task {task_id} merged, but: {detail}")]
    PartialApprove { task_id: u64, detail: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Store(e) => e.kind(),
            EngineError::Pool(e) => e.kind(),
            EngineError::Git(e) => e.kind(),
            EngineError::Agent(e) => e.kind(),
            EngineError::TaskNotFound { .. } | EngineError::BranchNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::NotPendingReview { .. } | EngineError::Validation { .. } => {
                ErrorKind::Validation
            }
            EngineError::AgentFailed { .. } | EngineError::PartialApprove { .. } => {
                ErrorKind::External
            }
        }
    }
}
