// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool status reporting types. Serialized onto the wire as-is.

use serde::{Deserialize, Serialize};

/// Snapshot of the whole pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub max_workers: u32,
    pub existing: u32,
    pub idle: u32,
    pub busy: u32,
    pub workers: Vec<WorkerStatus>,
}

/// Snapshot of one workspace slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub index: u32,
    pub path: String,
    pub state: WorkerState,
}

/// What a workspace slot is doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkerState {
    /// Directory not created yet; counts as capacity headroom.
    Unprovisioned,
    Idle,
    Busy {
        task_id: u64,
        task_title: String,
        pid: u32,
        age_secs: u64,
    },
    /// Lease present but reclaimable (dead pid, over-age, or corrupt).
    Stale { reason: String },
}
