// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sh(dir: &Path, script: &str) {
    let status = std::process::Command::new("sh")
        .args(["-c", script])
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "script failed: {script}");
}

/// A fresh repo with one commit on `main`.
fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    sh(
        dir.path(),
        "git init -q -b main && \
         git config user.email t@t && git config user.name t && \
         echo base > base.txt && git add . && git commit -qm init",
    );
    dir
}

#[tokio::test]
async fn current_branch_reports_main() {
    let repo = init_repo();
    assert_eq!(current_branch(repo.path()).await.unwrap(), "main");
}

#[tokio::test]
async fn branch_exists_toggles() {
    let repo = init_repo();
    assert!(!branch_exists(repo.path(), "task_1").await.unwrap());
    sh(repo.path(), "git branch task_1");
    assert!(branch_exists(repo.path(), "task_1").await.unwrap());
}

#[tokio::test]
async fn merge_no_ff_creates_merge_commit() {
    let repo = init_repo();
    sh(
        repo.path(),
        "git switch -qc task_1 && echo work > work.txt && git add . && \
         git commit -qm work && git switch -q main",
    );

    merge_no_ff(repo.path(), "task_1", "Merge task #1: T").await.unwrap();

    let output = std::process::Command::new("git")
        .args(["-C", &repo.path().display().to_string(), "log", "-1", "--format=%s"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Merge task #1: T");
}

#[tokio::test]
async fn merge_conflict_is_reported_and_aborted() {
    let repo = init_repo();
    sh(
        repo.path(),
        "git switch -qc task_1 && echo left > base.txt && git add . && git commit -qm left && \
         git switch -q main && echo right > base.txt && git add . && git commit -qm right",
    );

    let err = merge_no_ff(repo.path(), "task_1", "Merge task #1: T").await.unwrap_err();

    assert!(matches!(err, GitError::MergeConflict { .. }), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Conflict);
    // Aborted: no MERGE_HEAD left behind.
    assert!(!repo.path().join(".git/MERGE_HEAD").exists());
}

#[tokio::test]
async fn delete_branch_force_discards_unmerged() {
    let repo = init_repo();
    sh(
        repo.path(),
        "git switch -qc task_2 && echo w > w.txt && git add . && git commit -qm w && \
         git switch -q main",
    );

    assert!(delete_branch(repo.path(), "task_2", false).await.is_err());
    delete_branch(repo.path(), "task_2", true).await.unwrap();
    assert!(!branch_exists(repo.path(), "task_2").await.unwrap());
}

#[tokio::test]
async fn worktree_add_list_prune_roundtrip() {
    let repo = init_repo();
    let wt = repo.path().parent().unwrap().join(format!(
        "{}-worker1",
        repo.path().file_name().unwrap().to_string_lossy()
    ));

    worktree_add_detached(repo.path(), &wt).await.unwrap();
    let listed = worktree_list(repo.path()).await.unwrap();
    assert!(listed.iter().any(|p| p.ends_with(wt.file_name().unwrap())), "{listed:?}");

    std::fs::remove_dir_all(&wt).unwrap();
    worktree_prune(repo.path()).await.unwrap();
    let listed = worktree_list(repo.path()).await.unwrap();
    assert!(!listed.iter().any(|p| p.ends_with(wt.file_name().unwrap())));
}

#[tokio::test]
async fn reset_and_clean_restore_a_dirty_tree() {
    let repo = init_repo();
    sh(repo.path(), "echo dirty > base.txt && echo junk > junk.txt");

    reset_hard(repo.path(), "HEAD").await.unwrap();
    clean_untracked(repo.path()).await.unwrap();

    assert_eq!(std::fs::read_to_string(repo.path().join("base.txt")).unwrap(), "base\n");
    assert!(!repo.path().join("junk.txt").exists());
}

#[tokio::test]
async fn switch_create_branch_resets_existing() {
    let repo = init_repo();
    sh(repo.path(), "git branch task_3");

    switch_create_branch(repo.path(), "task_3").await.unwrap();
    assert_eq!(current_branch(repo.path()).await.unwrap(), "task_3");
}
