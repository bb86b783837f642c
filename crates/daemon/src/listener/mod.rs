// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Accepts connections on the Unix socket (and TCP when configured)
//! and spawns a task per connection. A connection carries exactly one
//! request/response pair, except `AttachTerminal`, which upgrades the
//! connection into a terminal byte stream.

mod repos;
mod review;
mod tasks;
mod terminal;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use nv_adapters::{CliAgentAdapter, DesktopNotifier};
use nv_core::{ErrorKind, SystemClock};
use nv_engine::{Engine, EngineConfig};
use nv_term::TermMux;
use nv_wire::{ProtocolError, Request, Response};

use crate::config::RepoRegistry;
use crate::env::{self, PROTOCOL_VERSION};

/// Shared daemon context for all request handlers.
pub(crate) struct ListenCtx {
    /// Engine for the active repository; `None` until one is known.
    pub engine: RwLock<Option<Engine<SystemClock>>>,
    pub mux: TermMux,
    pub repos: Mutex<RepoRegistry>,
    pub allowed_origins: Vec<String>,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
}

impl ListenCtx {
    pub fn new(registry: RepoRegistry) -> Self {
        Self {
            engine: RwLock::new(None),
            mux: TermMux::new(),
            repos: Mutex::new(registry),
            allowed_origins: env::allowed_origins(),
            start_time: Instant::now(),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Snapshot of the active engine, if any. Cloned out so no lock is
    /// held across the handler's awaits.
    pub fn engine(&self) -> Option<Engine<SystemClock>> {
        self.engine.read().clone()
    }

    /// Point the daemon at a repository: new engine, new shell cwd.
    /// Existing terminal sessions are untouched.
    pub fn install_repo(&self, root: &Path) {
        let mut config = EngineConfig::new(root, env::agent_cmd());
        config.allowed_roots = env::allowed_roots();
        config.max_workers = env::max_workers();
        config.max_lease_age = env::lease_max_age();
        config.accept_timeout = env::accept_timeout();
        let engine = Engine::new(
            config,
            Arc::new(CliAgentAdapter),
            Arc::new(DesktopNotifier),
            SystemClock,
        );
        *self.engine.write() = Some(engine);
        self.mux.set_cwd(Some(root.to_path_buf()));
        info!(repo = %root.display(), "active repository installed");
    }
}

/// Listener task for accepting socket connections.
pub(crate) struct Listener {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, tcp: Option<TcpListener>, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp, ctx }
    }

    /// Run the accept loop until the daemon shuts down.
    pub async fn run(mut self) {
        match self.tcp.take() {
            Some(tcp) => self.run_dual(tcp).await,
            None => self.run_unix_only().await,
        }
    }

    async fn run_unix_only(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) =
                            handle_connection(reader, writer, ConnectionSource::Unix, &ctx).await
                        {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("unix accept error: {}", e),
            }
        }
    }

    async fn run_dual(self, tcp: TcpListener) {
        loop {
            tokio::select! {
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, ConnectionSource::Unix, &ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("unix accept error: {}", e),
                },
                result = tcp.accept() => match result {
                    Ok((stream, addr)) => {
                        debug!("tcp connection from {}", addr);
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, ConnectionSource::Tcp, &ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("tcp accept error: {}", e),
                },
            }
        }
    }
}

/// Where a connection came from; network clients face the origin gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionSource {
    Unix,
    Tcp,
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => warn!("connection timeout"),
        _ => error!("connection error: {}", e),
    }
}

/// Handle a single client connection: one request, one response —
/// except terminal attach, which takes over the connection.
pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    source: ConnectionSource,
    ctx: &Arc<ListenCtx>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let request: Request = nv_wire::read_msg(&mut reader, env::ipc_timeout()).await?;

    match request {
        Request::AttachTerminal { session_id, origin } => {
            terminal::handle_attach(session_id, origin, source, reader, writer, ctx).await
        }
        Request::Shutdown => {
            nv_wire::write_msg(&mut writer, &Response::ShuttingDown, env::ipc_timeout()).await?;
            info!("shutdown requested");
            ctx.shutdown.notify_waiters();
            Ok(())
        }
        other => {
            let response = dispatch(ctx, other).await;
            nv_wire::write_msg(&mut writer, &response, env::ipc_timeout()).await?;
            Ok(())
        }
    }
}

/// Route one request to its handler.
pub(crate) async fn dispatch(ctx: &ListenCtx, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,
        Request::Hello { .. } => Response::Hello { version: PROTOCOL_VERSION.to_string() },
        Request::Status => handle_status(ctx),

        Request::ListTasks => tasks::handle_list(ctx),
        Request::SaveTasks { tasks } => tasks::handle_save(ctx, tasks),
        Request::UpdateTask { task } => tasks::handle_update(ctx, task),
        Request::MoveTask { id, status } => tasks::handle_move(ctx, id, &status).await,
        Request::ReadPlan => tasks::handle_read_plan(ctx),
        Request::WritePlan { content } => tasks::handle_write_plan(ctx, &content),
        Request::PoolStatus => tasks::handle_pool_status(ctx),

        Request::ApproveTask { id } => review::handle_approve(ctx, id).await,
        Request::RejectTask { id } => review::handle_reject(ctx, id).await,

        Request::OpenTerminal => {
            Response::TerminalOpened { session_id: ctx.mux.open().to_string() }
        }

        Request::ActiveRepository => repos::handle_active(ctx),
        Request::SwitchRepository { id } => repos::handle_switch(ctx, &id),
        Request::ListRepositories => repos::handle_list(ctx),
        Request::AddRepository { path } => repos::handle_add(ctx, &path),
        Request::RemoveRepository { id } => repos::handle_remove(ctx, &id),
        Request::ValidateRepository { path } => repos::handle_validate(&path),

        // Handled upstream in handle_connection; reaching here means a
        // client embedded them in a batch they don't belong in.
        Request::AttachTerminal { .. } => {
            Response::error(ErrorKind::Validation, "attach must be the only request")
        }
        Request::Shutdown => Response::ShuttingDown,
    }
}

fn handle_status(ctx: &ListenCtx) -> Response {
    let busy_workers = ctx
        .engine()
        .and_then(|e| e.pool_status().ok())
        .map(|s| s.busy)
        .unwrap_or(0);
    Response::Status {
        status: nv_wire::StatusSummary {
            version: PROTOCOL_VERSION.to_string(),
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            busy_workers,
            terminal_sessions: ctx.mux.session_count(),
            repo: ctx.repos.lock().active_id().map(String::from),
        },
    }
}

/// Standard reply when no repository is active yet.
pub(super) fn no_active_repo() -> Response {
    Response::error(ErrorKind::NotFound, "no active repository; add or switch to one")
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
