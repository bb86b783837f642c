// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixture: one daemon, one repository, isolated state.

use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::{Duration, Instant};

pub use assert_cmd::Command;

pub fn sh(dir: &Path, script: &str) {
    let status = std::process::Command::new("sh")
        .args(["-c", script])
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "script failed in {}: {script}", dir.display());
}

/// A daemon with its own state/config dirs and one registered git repo.
pub struct World {
    _tmp: tempfile::TempDir,
    pub repo: PathBuf,
    state_dir: PathBuf,
    config_dir: PathBuf,
    agent: PathBuf,
    daemon: Child,
}

impl World {
    /// Boot a world whose agent runs `agent_body` as a shell script.
    /// `{task_file}` in the body expands to the mainline task file.
    pub fn new(agent_body: &str) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("repo");
        std::fs::create_dir(&repo).unwrap();
        sh(
            &repo,
            "git init -q -b main && \
             git config user.email spec@test && git config user.name spec && \
             echo base > base.txt && git add . && git commit -qm init",
        );
        std::fs::create_dir_all(repo.join("plan")).unwrap();
        std::fs::write(repo.join("plan/task.json"), "[]\n").unwrap();

        let task_file = repo.join("plan/task.json");
        let agent = tmp.path().join("agent.sh");
        let body = agent_body.replace("{task_file}", &task_file.display().to_string());
        std::fs::write(&agent, format!("#!/bin/sh\n{body}\n")).unwrap();
        sh(tmp.path(), "chmod 755 agent.sh");

        let state_dir = tmp.path().join("state");
        let config_dir = tmp.path().join("config");

        let daemon = std::process::Command::new(assert_cmd::cargo::cargo_bin("nvd"))
            .env("NV_STATE_DIR", &state_dir)
            .env("NV_CONFIG_DIR", &config_dir)
            .env("NV_AGENT_CMD", &agent)
            .env("NV_SPAWN_TIMEOUT_MS", "2000")
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .unwrap();

        let world = Self { _tmp: tmp, repo, state_dir, config_dir, agent, daemon };
        world.wait_for(|| world.nv().args(["daemon", "ping"]).output().unwrap().status.success());
        world.nv().args(["repo", "add"]).arg(&world.repo).assert().success();
        world
    }

    /// An agent that does nothing and exits cleanly.
    pub fn with_noop_agent() -> Self {
        Self::new("exit 0")
    }

    /// The canonical well-behaved agent: commit to the task branch,
    /// flip its own task to pending_review in the mainline file, exit.
    /// The sed range scopes the edit to the record with NV_TASK_ID.
    pub fn with_honest_agent() -> Self {
        Self::new(
            "set -e\n\
             echo done > work.txt\n\
             git add work.txt\n\
             git -c user.email=a@a -c user.name=a commit -qm \"agent work\"\n\
             sed -i \"/\\\"id\\\": $NV_TASK_ID,/,/}/ \
             s/\\\"status\\\": \\\"[a-z_]*\\\"/\\\"status\\\": \\\"pending_review\\\"/\" \
             {task_file}",
        )
    }

    /// `nv` preconfigured with this world's environment.
    pub fn nv(&self) -> Command {
        let mut cmd = Command::cargo_bin("nv").unwrap();
        cmd.env("NV_STATE_DIR", &self.state_dir)
            .env("NV_CONFIG_DIR", &self.config_dir)
            .env("NV_AGENT_CMD", &self.agent)
            .timeout(Duration::from_secs(30));
        cmd
    }

    pub fn task_file(&self) -> PathBuf {
        self.repo.join("plan/task.json")
    }

    pub fn tasks_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.task_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    pub fn worker(&self, n: u32) -> PathBuf {
        self.repo
            .parent()
            .unwrap()
            .join(format!("{}-worker{n}", self.repo.file_name().unwrap().to_string_lossy()))
    }

    pub fn lease_file(&self, n: u32) -> PathBuf {
        self.worker(n).join(".agent_state")
    }

    pub fn branch_exists(&self, branch: &str) -> bool {
        std::process::Command::new("git")
            .args(["-C", &self.repo.display().to_string(), "rev-parse", "--verify", "--quiet"])
            .arg(format!("refs/heads/{branch}"))
            .status()
            .unwrap()
            .success()
    }

    pub fn last_commit_subject(&self) -> String {
        let output = std::process::Command::new("git")
            .args(["-C", &self.repo.display().to_string(), "log", "-1", "--format=%s"])
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Poll `cond` for up to 30 seconds.
    pub fn wait_for(&self, mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while !cond() {
            assert!(Instant::now() < deadline, "condition never held");
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    /// Status string of task `id` from the on-disk file.
    pub fn task_status(&self, id: u64) -> String {
        self.tasks_json()
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["id"] == id)
            .map(|t| t["status"].as_str().unwrap_or_default().to_string())
            .unwrap_or_default()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        let _ = self.nv().args(["daemon", "stop"]).output();
        std::thread::sleep(Duration::from_millis(200));
        let _ = self.daemon.kill();
        let _ = self.daemon.wait();
    }
}
