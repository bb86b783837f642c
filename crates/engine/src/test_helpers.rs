// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use nv_adapters::{FakeAgentAdapter, NoopNotifier};
use nv_core::FakeClock;

use crate::{Engine, EngineConfig};

pub(crate) fn sh(dir: &Path, script: &str) {
    let status = std::process::Command::new("sh")
        .args(["-c", script])
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "script failed: {script}");
}

/// Temp dir containing `repo/` with one commit on main.
pub(crate) fn init_repo() -> (tempfile::TempDir, PathBuf) {
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

/// Write an executable agent script and return its path.
pub(crate) fn agent_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("agent.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Engine over `repo` with a scripted fake agent and a short
/// acceptance window.
pub(crate) fn fake_engine(repo: &Path, fake: Arc<FakeAgentAdapter>) -> Engine<FakeClock> {
    let stub = agent_script(repo.parent().unwrap_or(repo), "exit 0");
    let mut config = EngineConfig::new(repo, stub);
    config.accept_timeout = Duration::from_millis(500);
    Engine::new(config, fake, Arc::new(NoopNotifier), FakeClock::new())
}

/// Engine over `repo` running `agent_cmd` for real.
pub(crate) fn real_engine(repo: &Path, agent_cmd: PathBuf) -> Engine<FakeClock> {
    let mut config = EngineConfig::new(repo, agent_cmd);
    config.accept_timeout = Duration::from_millis(200);
    Engine::new(
        config,
        Arc::new(nv_adapters::CliAgentAdapter),
        Arc::new(NoopNotifier),
        FakeClock::new(),
    )
}

/// Poll until `cond` holds, failing after ten seconds.
pub(crate) async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
