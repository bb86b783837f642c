// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The review gate, end to end.

use crate::prelude::*;

#[test]
fn approve_closes_the_loop() {
    let world = World::with_honest_agent();
    world.nv().args(["task", "add", "T", "--status", "todo"]).assert().success();
    world.nv().args(["task", "move", "1", "doing"]).assert().success();
    world.wait_for(|| world.task_status(1) == "pending_review");

    world.nv().args(["review", "approve", "1"]).assert().success();

    assert_eq!(world.last_commit_subject(), "Merge task #1: T");
    assert!(!world.branch_exists("task_1"));
    assert_eq!(world.task_status(1), "done");
    assert!(world.repo.join("work.txt").exists(), "agent work landed on mainline");
}

#[test]
fn reject_discards_work_idempotently() {
    let world = World::with_honest_agent();
    world.nv().args(["task", "add", "Bad idea", "--status", "todo"]).assert().success();
    world.nv().args(["task", "move", "1", "doing"]).assert().success();
    world.wait_for(|| world.task_status(1) == "pending_review");
    assert!(world.branch_exists("task_1"));

    world.nv().args(["review", "reject", "1"]).assert().success();

    assert!(!world.branch_exists("task_1"));
    assert_eq!(world.task_status(1), "done");
    let tasks = world.tasks_json();
    assert_eq!(tasks[0]["title"], "NOT MERGED: Bad idea");
    assert_eq!(world.last_commit_subject(), "init", "nothing merged");

    // Second reject: no double marker, still success.
    world.nv().args(["review", "reject", "1"]).assert().success();
    let tasks = world.tasks_json();
    assert_eq!(tasks[0]["title"], "NOT MERGED: Bad idea");
}

#[test]
fn approve_without_branch_reports_not_found() {
    let world = World::with_noop_agent();
    world.nv().args(["task", "add", "Ghost"]).assert().success();
    // Force pending_review without any agent run.
    let edited = r#"[
  {
    "id": 1,
    "title": "Ghost",
    "status": "pending_review",
    "priority": "medium",
    "deps": [],
    "parent": null
  }
]"#;
    std::fs::write(world.task_file(), edited).unwrap();

    world.nv().args(["review", "approve", "1"]).assert().failure().code(2);
    assert_eq!(world.task_status(1), "pending_review", "task untouched");
}

#[test]
fn approve_of_non_review_task_is_rejected() {
    let world = World::with_noop_agent();
    world.nv().args(["task", "add", "T", "--status", "todo"]).assert().success();

    world.nv().args(["review", "approve", "1"]).assert().failure().code(2);
    assert_eq!(world.task_status(1), "todo");
}
