// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status transitions and their side effects.
//!
//! The transition table is deliberately small: only `todo → doing`
//! dispatches a side effect (the agent spawn); review transitions are
//! driven by the review module itself. The status change is durable
//! before the side effect starts, and the side effect may fail without
//! touching the status — a stuck `doing` task is the designed failure
//! signal, not a bug.

use tracing::error;

use nv_core::{Clock, Task, TaskStatus};

use crate::engine::Engine;
use crate::error::EngineError;

impl<C: Clock + 'static> Engine<C> {
    /// Move a task to a new status, dispatching any side effect.
    ///
    /// Returns as soon as the status change is persisted; the spawn
    /// flow (if any) runs in the background and reports only through
    /// logs and observable state.
    pub async fn move_task(&self, id: u64, new_status: TaskStatus) -> Result<Task, EngineError> {
        let old_status = self.get_task(id)?.status;
        let updated = self.store.move_status(id, new_status)?;

        if old_status == TaskStatus::Todo && new_status == TaskStatus::Doing {
            self.spawn_agent_flow(updated.clone());
        }
        Ok(updated)
    }

    /// Fire-and-forget agent flow. Failures (including panics) are
    /// logged; the lease guard inside the flow has already freed the
    /// workspace by the time they surface here.
    fn spawn_agent_flow(&self, task: Task) {
        let engine = self.clone();
        let task_id = task.id;
        let flow = tokio::spawn(async move {
            if let Err(e) = engine.launch_agent(&task).await {
                error!(task_id = task.id, kind = %e.kind(), error = %e, "agent flow failed");
            }
        });
        tokio::spawn(async move {
            if let Err(e) = flow.await {
                if e.is_panic() {
                    error!(task_id, "agent flow panicked");
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
