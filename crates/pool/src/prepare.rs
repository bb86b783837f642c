// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace preparation around an agent run.

use std::path::Path;

use nv_adapters::git;
use nv_adapters::GitError;

/// Bring a workspace to a pristine state at `mainline_rev` and put it
/// on a fresh task branch.
///
/// Reset before clean: `checkout --detach` refuses a dirty tree, and a
/// previous agent may have left anything behind.
pub(crate) async fn prepare(
    workspace: &Path,
    mainline_rev: &str,
    branch: &str,
) -> Result<(), GitError> {
    git::reset_hard(workspace, "HEAD").await?;
    git::clean_untracked(workspace).await?;
    git::checkout_detach(workspace, mainline_rev).await?;
    git::switch_create_branch(workspace, branch).await?;
    Ok(())
}

/// Detach the workspace from whatever branch it is on. Run after the
/// agent exits so the task branch can later be merged or deleted from
/// the mainline checkout.
pub async fn detach(workspace: &Path) -> Result<(), GitError> {
    git::checkout_detach(workspace, "HEAD").await
}
