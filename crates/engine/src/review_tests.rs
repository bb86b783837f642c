// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{fake_engine, init_repo, sh};
use nv_adapters::{git, FakeAgentAdapter};
use nv_core::test_support::task;
use std::path::Path;
use std::sync::Arc;

fn last_commit_subject(repo: &Path) -> String {
    let output = std::process::Command::new("git")
        .args(["-C", &repo.display().to_string(), "log", "-1", "--format=%s"])
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Engine plus one pending_review task with a committed task branch.
async fn review_fixture(id: u64) -> (tempfile::TempDir, std::path::PathBuf, Engine<nv_core::FakeClock>) {
    let (parent, repo) = init_repo();
    let engine = fake_engine(&repo, Arc::new(FakeAgentAdapter::new()));
    let mut t = task(id, TaskStatus::PendingReview);
    t.title = "T".into();
    engine.save_tasks(&[t]).unwrap();
    sh(
        &repo,
        &format!(
            "git switch -qc task_{id} && echo work > work_{id}.txt && git add work_{id}.txt && \
             git commit -qm work && git switch -q main"
        ),
    );
    (parent, repo, engine)
}

#[tokio::test]
async fn approve_merges_deletes_branch_and_closes() {
    let (_parent, repo, engine) = review_fixture(1).await;

    let approved = engine.approve(1).await.unwrap();

    assert_eq!(approved.status, TaskStatus::Done);
    assert_eq!(last_commit_subject(&repo), "Merge task #1: T");
    assert!(!git::branch_exists(&repo, "task_1").await.unwrap());
    assert!(repo.join("work_1.txt").exists(), "merged content is on mainline");
    assert_eq!(engine.list_tasks().unwrap()[0].status, TaskStatus::Done);
}

#[tokio::test]
async fn approve_without_branch_leaves_task_untouched() {
    let (_parent, repo) = init_repo();
    let engine = fake_engine(&repo, Arc::new(FakeAgentAdapter::new()));
    engine.save_tasks(&[task(1, TaskStatus::PendingReview)]).unwrap();

    let err = engine.approve(1).await.unwrap_err();

    assert!(matches!(err, EngineError::BranchNotFound { .. }));
    assert_eq!(engine.list_tasks().unwrap()[0].status, TaskStatus::PendingReview);
}

#[tokio::test]
async fn approve_requires_pending_review() {
    let (_parent, repo) = init_repo();
    let engine = fake_engine(&repo, Arc::new(FakeAgentAdapter::new()));
    engine.save_tasks(&[task(1, TaskStatus::Doing)]).unwrap();

    let err = engine.approve(1).await.unwrap_err();
    assert!(matches!(err, EngineError::NotPendingReview { .. }));
    assert_eq!(err.kind(), nv_core::ErrorKind::Validation);
}

#[tokio::test]
async fn approve_conflict_mutates_nothing() {
    let (_parent, repo, engine) = review_fixture(1).await;
    // Conflicting mainline edit to the same file the branch touches.
    sh(
        &repo,
        "git switch -q task_1 && echo left > base.txt && git add base.txt && \
         git commit -qm left && git switch -q main && echo right > base.txt && \
         git add base.txt && git commit -qm right",
    );

    let err = engine.approve(1).await.unwrap_err();

    assert_eq!(err.kind(), nv_core::ErrorKind::Conflict);
    assert!(git::branch_exists(&repo, "task_1").await.unwrap(), "branch survives a conflict");
    assert_eq!(engine.list_tasks().unwrap()[0].status, TaskStatus::PendingReview);
}

#[tokio::test]
async fn reject_discards_unmerged_work() {
    let (_parent, repo, engine) = review_fixture(2).await;

    let rejected = engine.reject(2).await.unwrap();

    assert_eq!(rejected.status, TaskStatus::Done);
    assert_eq!(rejected.title, "NOT MERGED: T");
    assert!(!git::branch_exists(&repo, "task_2").await.unwrap());
    assert_eq!(last_commit_subject(&repo), "init", "nothing was merged");
}

#[tokio::test]
async fn reject_is_idempotent_on_title() {
    let (_parent, _repo, engine) = review_fixture(2).await;

    engine.reject(2).await.unwrap();
    let again = engine.reject(2).await.unwrap();

    assert_eq!(again.title, "NOT MERGED: T");
    assert_eq!(engine.list_tasks().unwrap()[0].title, "NOT MERGED: T");
}

#[tokio::test]
async fn reject_with_missing_branch_still_closes() {
    let (_parent, repo) = init_repo();
    let engine = fake_engine(&repo, Arc::new(FakeAgentAdapter::new()));
    let mut t = task(3, TaskStatus::PendingReview);
    t.title = "Ghost".into();
    engine.save_tasks(&[t]).unwrap();

    let rejected = engine.reject(3).await.unwrap();

    assert_eq!(rejected.status, TaskStatus::Done);
    assert_eq!(rejected.title, "NOT MERGED: Ghost");
}

#[tokio::test]
async fn review_of_unknown_task_is_not_found() {
    let (_parent, repo) = init_repo();
    let engine = fake_engine(&repo, Arc::new(FakeAgentAdapter::new()));
    engine.save_tasks(&[]).unwrap();

    assert!(matches!(engine.approve(9).await.unwrap_err(), EngineError::TaskNotFound { id: 9 }));
    assert!(matches!(engine.reject(9).await.unwrap_err(), EngineError::TaskNotFound { id: 9 }));
}
