// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket client for the daemon.

use std::path::PathBuf;
use std::time::Duration;

use tokio::net::UnixStream;

use nv_core::{ErrorKind, Task};
use nv_wire::{ProtocolError, Request, Response};

use crate::exit_error::ExitError;

/// Errors talking to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("daemon is not running (start it with `nv daemon start`)")]
    NotRunning,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon error: {message}")]
    Daemon { kind: ErrorKind, message: String },

    #[error("unexpected response from daemon")]
    Unexpected,
}

impl From<ClientError> for ExitError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Daemon { kind, message } => ExitError::from_daemon(kind, message),
            other => ExitError::new(1, other.to_string()),
        }
    }
}

/// Resolve the daemon socket the same way the daemon does.
pub fn socket_path() -> Result<PathBuf, ClientError> {
    let state_dir = if let Ok(dir) = std::env::var("NV_STATE_DIR") {
        PathBuf::from(dir)
    } else if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        PathBuf::from(xdg).join("navvy")
    } else {
        let home = std::env::var("HOME").map_err(|_| ClientError::NotRunning)?;
        PathBuf::from(home).join(".local/state/navvy")
    };
    Ok(state_dir.join("nvd.sock"))
}

/// One-request-per-connection client.
pub struct DaemonClient {
    socket: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn connect() -> Result<Self, ClientError> {
        Ok(Self { socket: socket_path()?, timeout: Duration::from_secs(30) })
    }

    /// Send one request, await one response. `Error` responses become
    /// typed [`ClientError::Daemon`] values.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream =
            UnixStream::connect(&self.socket).await.map_err(|_| ClientError::NotRunning)?;
        nv_wire::write_msg(&mut stream, request, self.timeout).await?;
        match nv_wire::read_msg::<_, Response>(&mut stream, self.timeout).await? {
            Response::Error { kind, message } => Err(ClientError::Daemon { kind, message }),
            response => Ok(response),
        }
    }

    /// Open a raw connection for the terminal attach upgrade.
    pub async fn open_stream(&self) -> Result<UnixStream, ClientError> {
        UnixStream::connect(&self.socket).await.map_err(|_| ClientError::NotRunning)
    }

    fn reject<T>(_other: Response) -> Result<T, ClientError> {
        Err(ClientError::Unexpected)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        match self.send(&Request::ListTasks).await? {
            Response::Tasks { tasks } => Ok(tasks),
            other => Self::reject(other),
        }
    }

    pub async fn save_tasks(&self, tasks: Vec<Task>) -> Result<(), ClientError> {
        match self.send(&Request::SaveTasks { tasks }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn update_task(&self, task: Task) -> Result<(), ClientError> {
        match self.send(&Request::UpdateTask { task }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn move_task(&self, id: u64, status: &str) -> Result<Task, ClientError> {
        match self.send(&Request::MoveTask { id, status: status.to_string() }).await? {
            Response::Task { task } => Ok(task),
            other => Self::reject(other),
        }
    }

    pub async fn approve(&self, id: u64) -> Result<Task, ClientError> {
        match self.send(&Request::ApproveTask { id }).await? {
            Response::Task { task } => Ok(task),
            other => Self::reject(other),
        }
    }

    pub async fn reject_task(&self, id: u64) -> Result<Task, ClientError> {
        match self.send(&Request::RejectTask { id }).await? {
            Response::Task { task } => Ok(task),
            other => Self::reject(other),
        }
    }

    pub async fn pool_status(&self) -> Result<nv_wire::PoolStatus, ClientError> {
        match self.send(&Request::PoolStatus).await? {
            Response::Pool { status } => Ok(status),
            other => Self::reject(other),
        }
    }
}
