// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::discover::workspace_path;
use crate::lease_file::read_lease;
use crate::LeaseRead;
use nv_core::FakeClock;
use std::path::Path;

/// A pid that cannot be running (beyond the default Linux pid_max).
const DEAD_PID: u32 = 2_000_000_000;

fn sh(dir: &Path, script: &str) {
    let status = std::process::Command::new("sh")
        .args(["-c", script])
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "script failed: {script}");
}

/// Temp dir containing `repo/` with one commit on main.
fn init_repo() -> (tempfile::TempDir, std::path::PathBuf) {
    let parent = tempfile::tempdir().unwrap();
    let repo = parent.path().join("repo");
    std::fs::create_dir(&repo).unwrap();
    sh(
        &repo,
        "git init -q -b main && \
         git config user.email t@t && git config user.name t && \
         echo base > base.txt && git add . && git commit -qm init",
    );
    (parent, repo)
}

fn pool(repo: &Path) -> (WorktreePool<FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    clock.set_epoch_secs(1_700_000_000);
    (WorktreePool::new(PoolConfig::new(repo), clock.clone()), clock)
}

async fn branch_of(dir: &Path) -> String {
    nv_adapters::git::current_branch(dir).await.unwrap()
}

#[tokio::test]
async fn acquire_provisions_worker1_on_task_branch() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let lease = pool.acquire(1, "First task").await.unwrap();

    let ws = workspace_path(&repo, 1);
    assert_eq!(lease.worker, 1);
    assert_eq!(lease.task_id, 1);
    assert_eq!(lease.pid, std::process::id());
    assert_eq!(lease.worktree, ws.display().to_string());
    assert!(ws.is_dir());
    assert_eq!(branch_of(&ws).await, "task_1");
    assert!(matches!(read_lease(&ws, 1).unwrap(), LeaseRead::Busy(_)));
}

#[tokio::test]
async fn saturated_pool_fails_with_pool_full() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    pool.acquire(1, "A").await.unwrap();
    pool.acquire(2, "B").await.unwrap();
    let err = pool.acquire(3, "C").await.unwrap_err();

    assert!(matches!(err, PoolError::PoolFull { max: 2 }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn release_makes_the_workspace_reusable() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let lease = pool.acquire(1, "A").await.unwrap();
    pool.release(&lease).await.unwrap();

    let next = pool.acquire(2, "B").await.unwrap();
    assert_eq!(next.worker, 1, "released slot is reused, not grown past");
    assert_eq!(branch_of(workspace_path(&repo, 1).as_path()).await, "task_2");
}

#[tokio::test]
async fn lowest_idle_index_wins() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let l1 = pool.acquire(1, "A").await.unwrap();
    let _l2 = pool.acquire(2, "B").await.unwrap();
    pool.release(&l1).await.unwrap();

    let next = pool.acquire(3, "C").await.unwrap();
    assert_eq!(next.worker, 1);
}

#[tokio::test]
async fn dead_pid_lease_is_reclaimed() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let mut lease = pool.acquire(1, "A").await.unwrap();
    lease.pid = DEAD_PID;
    write_lease(lease.worktree.as_ref(), &lease).unwrap();

    // Workspace 1 is reused rather than workspace 2 created.
    let next = pool.acquire(5, "Fresh").await.unwrap();
    assert_eq!(next.worker, 1);
    assert_eq!(next.task_id, 5);
    assert!(!workspace_path(&repo, 2).exists());
}

#[tokio::test]
async fn over_age_lease_with_live_pid_is_reclaimed() {
    let (_parent, repo) = init_repo();
    let (pool, clock) = pool(&repo);

    pool.acquire(1, "A").await.unwrap();
    clock.advance(std::time::Duration::from_secs(2 * 60 * 60 + 60));

    let next = pool.acquire(6, "B").await.unwrap();
    assert_eq!(next.worker, 1);
    assert_eq!(next.task_id, 6);
}

#[tokio::test]
async fn corrupt_lease_is_reclaimed() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    pool.acquire(1, "A").await.unwrap();
    let ws = workspace_path(&repo, 1);
    std::fs::write(ws.join(nv_core::LEASE_FILE), "pid=nope\n").unwrap();

    let next = pool.acquire(2, "B").await.unwrap();
    assert_eq!(next.worker, 1);
}

#[tokio::test]
async fn acquire_cleans_a_dirty_workspace() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let lease = pool.acquire(1, "A").await.unwrap();
    let ws = workspace_path(&repo, 1);
    sh(&ws, "echo dirty > base.txt && echo junk > junk.txt");
    pool.release(&lease).await.unwrap();

    pool.acquire(2, "B").await.unwrap();

    assert_eq!(std::fs::read_to_string(ws.join("base.txt")).unwrap(), "base\n");
    assert!(!ws.join("junk.txt").exists());
}

#[tokio::test]
async fn adopt_pid_restamps_the_record() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let mut lease = pool.acquire(1, "A").await.unwrap();
    pool.adopt_pid(&mut lease, 4242).unwrap();

    match read_lease(workspace_path(&repo, 1).as_path(), 1).unwrap() {
        LeaseRead::Busy(read) => assert_eq!(read.pid, 4242),
        other => panic!("expected Busy, got {other:?}"),
    }
}

#[tokio::test]
async fn status_reports_slots_without_reclaiming() {
    let (_parent, repo) = init_repo();
    let (pool, _) = pool(&repo);

    let mut lease = pool.acquire(1, "Important work").await.unwrap();

    let status = pool.status().unwrap();
    assert_eq!(status.max_workers, 2);
    assert_eq!(status.existing, 1);
    assert_eq!(status.busy, 1);
    assert_eq!(status.idle, 0);
    assert!(matches!(status.workers[0].state, WorkerState::Busy { task_id: 1, .. }));
    assert!(matches!(status.workers[1].state, WorkerState::Unprovisioned));

    // A stale lease shows as stale but the record is untouched.
    lease.pid = DEAD_PID;
    write_lease(lease.worktree.as_ref(), &lease).unwrap();
    let status = pool.status().unwrap();
    assert!(matches!(status.workers[0].state, WorkerState::Stale { .. }));
    assert!(matches!(
        read_lease(workspace_path(&repo, 1).as_path(), 1).unwrap(),
        LeaseRead::Busy(_)
    ));
}
