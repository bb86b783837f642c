// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nv-storage: durable task list and plan document.
//!
//! The task store is the single owner of `plan/task.json`. Every mutation
//! goes backup → temp file → fsync → rename, under an exclusive advisory
//! lock; readers take a shared lock and always see a complete snapshot.

mod backup;
mod plan;
mod tasks;

pub use backup::{create_backup, purge_old_backups};
pub use plan::PlanDoc;
pub use tasks::{StoreError, TaskStore};
