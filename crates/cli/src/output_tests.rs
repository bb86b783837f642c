// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nv_core::test_support::{task, task_board};
use nv_core::TaskStatus;
use nv_wire::{PoolStatus, WorkerStatus};

#[test]
fn empty_board_says_so() {
    assert_eq!(render_tasks(&[]), "no tasks\n");
}

#[test]
fn tasks_are_grouped_by_column() {
    let out = render_tasks(&task_board());

    let todo_pos = out.find("todo\n").unwrap();
    let doing_pos = out.find("doing\n").unwrap();
    assert!(todo_pos < doing_pos, "columns in board order:\n{out}");
    assert!(out.contains("#1"));
    assert!(out.contains("[medium]"));
}

#[test]
fn deps_are_listed_when_present() {
    let mut t = task(3, TaskStatus::Todo);
    t.deps = vec![1, 2];
    let out = render_tasks(&[t]);
    assert!(out.contains("deps: #1, #2"), "{out}");
}

#[test]
fn pool_rendering_covers_all_states() {
    let status = PoolStatus {
        max_workers: 2,
        existing: 1,
        idle: 0,
        busy: 1,
        workers: vec![
            WorkerStatus {
                index: 1,
                path: "/tmp/repo-worker1".into(),
                state: nv_wire::WorkerState::Busy {
                    task_id: 7,
                    task_title: "Fix login".into(),
                    pid: 4242,
                    age_secs: 65,
                },
            },
            WorkerStatus {
                index: 2,
                path: "/tmp/repo-worker2".into(),
                state: nv_wire::WorkerState::Unprovisioned,
            },
        ],
    };

    let out = render_pool(&status);
    assert!(out.contains("1 of 2 provisioned"));
    assert!(out.contains("worker1: task #7 (Fix login) pid 4242 for 1m05s"));
    assert!(out.contains("worker2: -"));
}
