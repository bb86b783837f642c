// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle and registry specs.

use crate::prelude::*;

#[test]
fn status_reports_the_active_repo() {
    let world = World::with_noop_agent();

    let status = world.nv().args(["daemon", "status"]).output().unwrap();
    let rendered = String::from_utf8_lossy(&status.stdout).to_string();
    assert!(rendered.contains("version:"), "{rendered}");
    assert!(rendered.contains("repo:"), "{rendered}");
    assert!(!rendered.contains("repo:      (none)"), "{rendered}");
}

#[test]
fn repo_registry_is_visible_through_the_cli() {
    let world = World::with_noop_agent();

    let listed = world.nv().args(["repo", "list"]).output().unwrap();
    let rendered = String::from_utf8_lossy(&listed.stdout).to_string();
    assert!(rendered.contains("repo"), "{rendered}");
    assert!(rendered.starts_with('*'), "the only repo is active: {rendered}");

    world.nv().args(["repo", "validate"]).arg(&world.repo).assert().success();

    let bogus = world.repo.join("not-a-repo");
    std::fs::create_dir(&bogus).unwrap();
    world.nv().args(["repo", "validate"]).arg(&bogus).assert().failure().code(2);
}

#[test]
fn term_open_allocates_session_ids() {
    let world = World::with_noop_agent();
    let one = world.nv().args(["term", "open"]).output().unwrap();
    let two = world.nv().args(["term", "open"]).output().unwrap();

    let one = String::from_utf8_lossy(&one.stdout).trim().to_string();
    let two = String::from_utf8_lossy(&two.stdout).trim().to_string();
    assert!(one.starts_with("term-"), "{one}");
    assert_ne!(one, two);
}

#[test]
fn stop_then_ping_fails() {
    let world = World::with_noop_agent();
    world.nv().args(["daemon", "stop"]).assert().success();

    world.wait_for(|| !world.nv().args(["daemon", "ping"]).output().unwrap().status.success());
}
