// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent pipeline: spawn on todo→doing, leases, stale reclamation,
//! saturation.

use crate::prelude::*;

#[test]
fn happy_path_single_task() {
    let world = World::with_honest_agent();
    world.nv().args(["task", "add", "T", "--status", "todo"]).assert().success();

    world.nv().args(["task", "move", "1", "doing"]).assert().success();

    // Status change is visible immediately, before the agent finishes.
    assert_eq!(world.task_status(1), "doing");

    // The agent may be fast enough that we only observe its effects,
    // so poll for the end state rather than the lease itself.
    world.wait_for(|| world.task_status(1) == "pending_review");
    world.wait_for(|| !world.lease_file(1).exists());

    // The agent committed on the task branch; mainline never moved.
    assert!(world.branch_exists("task_1"));
    assert_eq!(world.last_commit_subject(), "init");
    assert!(world.worker(1).is_dir(), "workspace is kept for reuse");
}

#[test]
fn stale_lease_is_reclaimed_not_leaked() {
    let world = World::with_honest_agent();
    world.nv().args(["task", "add", "Warmup", "--status", "todo"]).assert().success();
    world.nv().args(["task", "add", "Real work", "--status", "todo"]).assert().success();

    // First run provisions worker1 and releases it.
    world.nv().args(["task", "move", "1", "doing"]).assert().success();
    world.wait_for(|| !world.lease_file(1).exists() && world.worker(1).is_dir());

    // Fake a crashed agent: a lease naming a pid that cannot exist.
    std::fs::write(
        world.lease_file(1),
        "status=running\npid=1999999999\ntask_id=1\ntask_title=Warmup\n\
         started=1700000000\nstarted_human=old\nworktree=gone\n",
    )
    .unwrap();

    world.nv().args(["task", "move", "2", "doing"]).assert().success();

    // Worker1 is reused for task 2; no worker2 appears.
    world.wait_for(|| world.task_status(2) == "pending_review");
    assert!(!world.worker(2).exists(), "stale slot must be reused, not grown past");
}

#[test]
fn saturated_pool_leaves_task_stuck_in_doing() {
    let world = World::with_honest_agent();
    world.nv().args(["task", "add", "Stuck", "--status", "todo"]).assert().success();

    // Both slots busy with leases owned by a live process (this test).
    let me = std::process::id();
    for n in 1..=2 {
        std::fs::create_dir_all(world.worker(n)).unwrap();
        std::fs::write(
            world.lease_file(n),
            format!(
                "status=running\npid={me}\ntask_id={n}\ntask_title=busy\n\
                 started=9999999999\nstarted_human=now\nworktree=w\n"
            ),
        )
        .unwrap();
    }

    world.nv().args(["task", "move", "1", "doing"]).assert().success();

    // The move persisted; the background spawn failed; nothing rolls back.
    std::thread::sleep(std::time::Duration::from_secs(2));
    assert_eq!(world.task_status(1), "doing");
    let pool = world.nv().args(["pool"]).output().unwrap();
    let rendered = String::from_utf8_lossy(&pool.stdout).to_string();
    assert!(rendered.contains("2 busy"), "{rendered}");
}

#[test]
fn failing_agent_leaves_doing_for_the_user() {
    let world = World::new("echo agent exploded >&2; exit 1");
    world.nv().args(["task", "add", "Doomed", "--status", "todo"]).assert().success();

    world.nv().args(["task", "move", "1", "doing"]).assert().success();

    // The lease must be released even though the agent failed.
    world.wait_for(|| world.worker(1).is_dir() && !world.lease_file(1).exists());
    assert_eq!(world.task_status(1), "doing");
}

#[test]
fn pool_status_shows_a_busy_worker_during_a_run() {
    // An agent slow enough to observe mid-flight.
    let world = World::new("sleep 3; exit 0");
    world.nv().args(["task", "add", "Slow burn", "--status", "todo"]).assert().success();

    world.nv().args(["task", "move", "1", "doing"]).assert().success();
    world.wait_for(|| world.lease_file(1).exists());

    let pool = world.nv().args(["pool"]).output().unwrap();
    let rendered = String::from_utf8_lossy(&pool.stdout).to_string();
    assert!(rendered.contains("task #1"), "{rendered}");
    assert!(rendered.contains("Slow burn"), "{rendered}");

    world.wait_for(|| !world.lease_file(1).exists());
}
