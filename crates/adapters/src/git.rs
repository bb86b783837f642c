// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git plumbing used by the pool and review subsystems.
//!
//! Commands run with `-C <dir>` so nothing depends on the daemon's cwd.
//! Nonzero exits surface the captured combined output; merge conflicts
//! are distinguished so the facade can report them as conflicts rather
//! than generic git failures.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use nv_core::ErrorKind;

use crate::subprocess::{
    combined_output, run_with_timeout, SubprocessError, GIT_TIMEOUT, GIT_WORKTREE_TIMEOUT,
};

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    #[error("git {op} failed: {output}")]
    Failed { op: String, output: String },

    #[error("merge conflict: {output}")]
    MergeConflict { output: String },
}

impl GitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitError::MergeConflict { .. } => ErrorKind::Conflict,
            GitError::Subprocess(_) | GitError::Failed { .. } => ErrorKind::External,
        }
    }
}

async fn git(dir: &Path, args: &[&str], timeout: Duration, label: &str) -> Result<Output, GitError> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir).args(args);
    Ok(run_with_timeout(cmd, timeout, label).await?)
}

/// Run git and require a zero exit; returns trimmed stdout.
async fn git_ok(dir: &Path, args: &[&str], timeout: Duration, label: &str) -> Result<String, GitError> {
    let output = git(dir, args, timeout, label).await?;
    if !output.status.success() {
        return Err(GitError::Failed {
            op: label.to_string(),
            output: combined_output(&output),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Name of the currently checked-out branch.
pub async fn current_branch(repo: &Path) -> Result<String, GitError> {
    git_ok(repo, &["symbolic-ref", "--short", "HEAD"], GIT_TIMEOUT, "symbolic-ref").await
}

/// Resolve a revision to a commit hash.
pub async fn rev_parse(repo: &Path, rev: &str) -> Result<String, GitError> {
    git_ok(repo, &["rev-parse", rev], GIT_TIMEOUT, "rev-parse").await
}

/// Whether a local branch exists.
pub async fn branch_exists(repo: &Path, branch: &str) -> Result<bool, GitError> {
    let refname = format!("refs/heads/{branch}");
    let output =
        git(repo, &["rev-parse", "--verify", "--quiet", &refname], GIT_TIMEOUT, "rev-parse").await?;
    Ok(output.status.success())
}

/// Merge `branch` into the current branch with a merge commit.
///
/// On conflict the merge is aborted (best effort) and the captured
/// output is returned so the user can see which paths collided.
pub async fn merge_no_ff(repo: &Path, branch: &str, message: &str) -> Result<(), GitError> {
    let output =
        git(repo, &["merge", "--no-ff", "-m", message, branch], GIT_TIMEOUT, "merge").await?;
    if !output.status.success() {
        let captured = combined_output(&output);
        let _ = git(repo, &["merge", "--abort"], GIT_TIMEOUT, "merge --abort").await;
        return Err(GitError::MergeConflict { output: captured });
    }
    Ok(())
}

/// Delete a local branch. `force` uses `-D` (discards unmerged work).
pub async fn delete_branch(repo: &Path, branch: &str, force: bool) -> Result<(), GitError> {
    let flag = if force { "-D" } else { "-d" };
    git_ok(repo, &["branch", flag, branch], GIT_TIMEOUT, "branch delete").await?;
    Ok(())
}

/// Discard tracked modifications: `reset --hard <rev>`.
pub async fn reset_hard(dir: &Path, rev: &str) -> Result<(), GitError> {
    git_ok(dir, &["reset", "--hard", rev], GIT_TIMEOUT, "reset --hard").await?;
    Ok(())
}

/// Remove untracked files and directories.
pub async fn clean_untracked(dir: &Path) -> Result<(), GitError> {
    git_ok(dir, &["clean", "-fd"], GIT_TIMEOUT, "clean").await?;
    Ok(())
}

/// Detach HEAD at a revision. Worktrees stay detached except while an
/// agent is on its task branch, so branches remain free to merge and
/// delete from the mainline checkout.
pub async fn checkout_detach(dir: &Path, rev: &str) -> Result<(), GitError> {
    git_ok(dir, &["checkout", "--detach", rev], GIT_TIMEOUT, "checkout --detach").await?;
    Ok(())
}

/// Create (or reset) a branch at HEAD and switch to it.
pub async fn switch_create_branch(dir: &Path, branch: &str) -> Result<(), GitError> {
    git_ok(dir, &["switch", "-C", branch], GIT_TIMEOUT, "switch -C").await?;
    Ok(())
}

/// Register a new detached worktree at `path`.
pub async fn worktree_add_detached(repo: &Path, path: &Path) -> Result<(), GitError> {
    let path_str = path.display().to_string();
    git_ok(
        repo,
        &["worktree", "add", "--detach", &path_str],
        GIT_WORKTREE_TIMEOUT,
        "worktree add",
    )
    .await?;
    Ok(())
}

/// Paths of all registered worktrees, the primary checkout first.
pub async fn worktree_list(repo: &Path) -> Result<Vec<PathBuf>, GitError> {
    let stdout =
        git_ok(repo, &["worktree", "list", "--porcelain"], GIT_TIMEOUT, "worktree list").await?;
    let mut paths = Vec::new();
    for line in stdout.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            paths.push(PathBuf::from(path));
        }
    }
    Ok(paths)
}

/// Drop registry entries whose directories are gone.
pub async fn worktree_prune(repo: &Path) -> Result<(), GitError> {
    git_ok(repo, &["worktree", "prune"], GIT_WORKTREE_TIMEOUT, "worktree prune").await?;
    Ok(())
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
