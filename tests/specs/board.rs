// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board CRUD through the CLI.

use crate::prelude::*;

#[test]
fn add_list_and_delete_tasks() {
    let world = World::with_noop_agent();

    world.nv().args(["task", "add", "First thing"]).assert().success();
    world
        .nv()
        .args(["task", "add", "Second thing", "--status", "todo", "--priority", "high"])
        .assert()
        .success();

    let listed = world.nv().args(["task", "list"]).output().unwrap();
    let board = String::from_utf8_lossy(&listed.stdout).to_string();
    assert!(board.contains("First thing"), "{board}");
    assert!(board.contains("[high] Second thing"), "{board}");

    // The file on disk is the pretty-printed contract format.
    let raw = std::fs::read_to_string(world.task_file()).unwrap();
    assert!(raw.contains("\n  {"), "two-space indented:\n{raw}");
    assert_eq!(world.task_status(2), "todo");

    world.nv().args(["task", "rm", "1"]).assert().success();
    let tasks = world.tasks_json();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[test]
fn rename_rewrites_only_the_title() {
    let world = World::with_noop_agent();
    world.nv().args(["task", "add", "Old name", "--status", "todo"]).assert().success();

    world.nv().args(["task", "rename", "1", "New name"]).assert().success();

    let tasks = world.tasks_json();
    assert_eq!(tasks[0]["title"], "New name");
    assert_eq!(tasks[0]["status"], "todo");
}

#[test]
fn move_to_unknown_status_fails_politely() {
    let world = World::with_noop_agent();
    world.nv().args(["task", "add", "T", "--status", "todo"]).assert().success();

    world
        .nv()
        .args(["task", "move", "1", "underway"])
        .assert()
        .failure()
        .code(2);
    assert_eq!(world.task_status(1), "todo");
}

#[test]
fn plan_document_roundtrips() {
    let world = World::with_noop_agent();

    world
        .nv()
        .args(["plan", "write"])
        .write_stdin("# Grand plan\n\n1. profit\n")
        .assert()
        .success();

    let shown = world.nv().args(["plan", "show"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&shown.stdout), "# Grand plan\n\n1. profit\n");

    // A backup of the previous version appears next to the plan.
    world.nv().args(["plan", "write"]).write_stdin("v2\n").assert().success();
    let backups = std::fs::read_dir(world.repo.join("plan"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.starts_with("plan.md.") && name.ends_with(".bak")
        })
        .count();
    assert!(backups >= 1);
}

#[test]
fn external_edits_are_visible_on_next_list() {
    let world = World::with_noop_agent();
    world.nv().args(["task", "add", "T", "--status", "todo"]).assert().success();

    // An external editor rewrites the file directly.
    let edited = r#"[
  {
    "id": 1,
    "title": "Edited outside",
    "status": "todo",
    "priority": "low",
    "deps": [],
    "parent": null
  }
]"#;
    std::fs::write(world.task_file(), edited).unwrap();

    let listed = world.nv().args(["task", "list"]).output().unwrap();
    assert!(String::from_utf8_lossy(&listed.stdout).contains("Edited outside"));
}
