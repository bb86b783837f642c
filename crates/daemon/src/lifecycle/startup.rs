// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup plumbing: logging, socket claim, pid file.

use std::path::{Path, PathBuf};

use tokio::net::{UnixListener, UnixStream};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Errors that stop the daemon from starting or keep it from state.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot determine a state directory (set NV_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("another daemon is already listening on {socket}")]
    AlreadyRunning { socket: PathBuf },

    #[error("repository registry: {0}")]
    Registry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Install the tracing subscriber: env-filtered, into a non-blocking
/// file appender under the state dir. Returns the guard that flushes
/// on drop.
pub fn init_tracing(state_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::daily(state_dir.join("logs"), "nvd.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("NV_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}

/// Bind the Unix socket, evicting a stale socket file if the daemon
/// that owned it is gone. A live daemon answers the probe connect and
/// wins.
pub async fn claim_socket(path: &Path) -> Result<UnixListener, LifecycleError> {
    if path.exists() {
        match UnixStream::connect(path).await {
            Ok(_) => {
                return Err(LifecycleError::AlreadyRunning { socket: path.to_path_buf() })
            }
            Err(_) => {
                info!(socket = %path.display(), "removing stale socket");
                std::fs::remove_file(path)?;
            }
        }
    }
    Ok(UnixListener::bind(path)?)
}

/// Pid file, removed on drop.
pub struct PidFile {
    path: PathBuf,
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn write_pid_file(state_dir: &Path) -> Result<PidFile, LifecycleError> {
    let path = state_dir.join("nvd.pid");
    std::fs::write(&path, format!("{}\n", std::process::id()))?;
    Ok(PidFile { path })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
