// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coding-agent subprocess boundary.
//!
//! The agent is an opaque interactive CLI invoked with a single prompt
//! argument. The adapter owns process mechanics only: restricted
//! environment, acceptance window, exit capture. What the prompt says
//! and what happens around the run is the engine's business.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::warn;

use nv_core::ErrorKind;

/// Flag appended to every invocation so the agent never stops to ask
/// for interactive permission while unattended.
const BYPASS_PERMISSIONS_FLAG: &str = "--dangerously-skip-permissions";

/// Everything needed to start one agent run.
#[derive(Debug, Clone)]
pub struct AgentSpawnSpec {
    /// Path to the agent executable (validated by the spawner).
    pub program: PathBuf,
    /// The full prompt, passed as the first argument.
    pub prompt: String,
    /// Leased workspace the agent runs in.
    pub workdir: PathBuf,
    /// Complete environment for the child; nothing else leaks in.
    pub env: Vec<(String, String)>,
    /// How long the spawner may block waiting for the agent to accept
    /// the invocation. Not a bound on the agent's total run time.
    pub accept_timeout: Duration,
}

/// Terminal state of an agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentExit {
    pub code: Option<i32>,
    /// Combined stdout+stderr, kept for failure logs.
    pub output: String,
}

impl AgentExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Outcome of [`AgentAdapter::launch`].
#[derive(Debug)]
pub enum AgentLaunch {
    /// Agent accepted the invocation and is still running.
    Running {
        pid: u32,
        /// Resolves when the subprocess exits.
        exit: oneshot::Receiver<AgentExit>,
    },
    /// Agent ran to completion within the acceptance window.
    Completed { exit: AgentExit },
}

/// Errors from launching an agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("failed to spawn agent: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("agent rejected the invocation (exit {code:?}): {output}")]
    Rejected { code: Option<i32>, output: String },

    #[error("agent subprocess has no pid")]
    NoPid,
}

impl AgentError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::External
    }
}

/// Starts agent subprocesses.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    async fn launch(&self, spec: AgentSpawnSpec) -> Result<AgentLaunch, AgentError>;
}

/// The real adapter: spawns `<program> <prompt> --dangerously-skip-permissions`.
pub struct CliAgentAdapter;

#[async_trait]
impl AgentAdapter for CliAgentAdapter {
    async fn launch(&self, spec: AgentSpawnSpec) -> Result<AgentLaunch, AgentError> {
        let mut cmd = Command::new(&spec.program);
        cmd.arg(&spec.prompt)
            .arg(BYPASS_PERMISSIONS_FLAG)
            .current_dir(&spec.workdir)
            .env_clear()
            .envs(spec.env.iter().cloned())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        let pid = child.id().ok_or(AgentError::NoPid)?;

        // Drain both pipes off-thread so a chatty agent never blocks on
        // a full pipe buffer.
        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let capture = tokio::spawn(async move {
            let mut out = Vec::new();
            let mut err = Vec::new();
            if let Some(ref mut pipe) = stdout {
                let _ = pipe.read_to_end(&mut out).await;
            }
            if let Some(ref mut pipe) = stderr {
                let _ = pipe.read_to_end(&mut err).await;
            }
            let mut text = String::from_utf8_lossy(&out).into_owned();
            let err_text = String::from_utf8_lossy(&err);
            if !err_text.is_empty() {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&err_text);
            }
            text
        });

        let (exit_tx, mut exit_rx) = oneshot::channel();

        tokio::spawn(async move {
            let status = child.wait().await;
            let output = capture.await.unwrap_or_default();
            let exit = AgentExit {
                code: status.ok().and_then(|s| s.code()),
                output,
            };
            if exit_tx.send(exit).is_err() {
                warn!(pid, "agent exit dropped: launcher went away");
            }
        });

        // Acceptance window: an agent that dies immediately (bad flag,
        // unusable workspace) is reported synchronously. A receiver
        // that times out here stays valid for the caller to await.
        match tokio::time::timeout(spec.accept_timeout, &mut exit_rx).await {
            Ok(Ok(exit)) => {
                if exit.success() {
                    Ok(AgentLaunch::Completed { exit })
                } else {
                    Err(AgentError::Rejected { code: exit.code, output: exit.output })
                }
            }
            // Waiter task cannot drop its sender without sending; treat
            // like a timeout and let the caller observe the channel.
            Ok(Err(_)) | Err(_) => Ok(AgentLaunch::Running { pid, exit: exit_rx }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAgentAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;

    /// Scripted adapter for engine tests: records every spawn spec and
    /// replays canned outcomes in order.
    #[derive(Default)]
    pub struct FakeAgentAdapter {
        pub spawns: Mutex<Vec<AgentSpawnSpec>>,
        outcomes: Mutex<Vec<Result<AgentExit, AgentError>>>,
    }

    impl FakeAgentAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue an outcome for the next launch (FIFO). With an empty
        /// queue, launches complete immediately with exit 0.
        pub fn push_outcome(&self, outcome: Result<AgentExit, AgentError>) {
            self.outcomes.lock().push(outcome);
        }

        pub fn spawn_count(&self) -> usize {
            self.spawns.lock().len()
        }
    }

    #[async_trait]
    impl AgentAdapter for FakeAgentAdapter {
        async fn launch(&self, spec: AgentSpawnSpec) -> Result<AgentLaunch, AgentError> {
            self.spawns.lock().push(spec);
            let next = {
                let mut outcomes = self.outcomes.lock();
                if outcomes.is_empty() {
                    None
                } else {
                    Some(outcomes.remove(0))
                }
            };
            match next {
                None => Ok(AgentLaunch::Completed {
                    exit: AgentExit { code: Some(0), output: String::new() },
                }),
                Some(Ok(exit)) => Ok(AgentLaunch::Completed { exit }),
                Some(Err(e)) => Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
