// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One PTY session: a shell child, its scrollback, and at most one
//! attached client.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::thread;

use parking_lot::Mutex;
use portable_pty::{native_pty_system, Child, CommandBuilder, PtySize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ring::RingBuffer;
use crate::{MAX_SCROLLBACK_BYTES, MAX_SCROLLBACK_LINES};

nv_core::define_id! {
    /// Opaque handle clients use to address a terminal session.
    pub struct SessionId("term-");
}

/// Errors from PTY setup and I/O.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("PTY error: {0}")]
    Pty(String),

    #[error("failed to spawn shell: {0}")]
    Spawn(String),

    #[error("PTY write error: {0}")]
    Write(#[from] std::io::Error),
}

/// Scrollback and the attached-client slot, guarded together so an
/// attach snapshots history and installs its tap atomically: every
/// output byte lands in exactly one of the two. The generation counter
/// lets a detach name exactly which attach it is undoing.
struct Shared {
    ring: RingBuffer,
    client: Option<(u64, mpsc::UnboundedSender<Vec<u8>>)>,
    generation: u64,
}

pub(crate) struct Session {
    pub id: SessionId,
    shared: Mutex<Shared>,
    writer: Mutex<Box<dyn Write + Send>>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
    /// Keeps the PTY master alive; dropping it would EOF the reader.
    _master: Mutex<Box<dyn portable_pty::MasterPty + Send>>,
}

impl Session {
    /// Spawn the shell under a fresh PTY and start the output pump.
    /// `on_exit` runs once when the child's output stream closes.
    pub fn spawn(
        id: SessionId,
        cwd: Option<PathBuf>,
        on_exit: impl FnOnce(SessionId) + Send + 'static,
    ) -> Result<std::sync::Arc<Self>, SessionError> {
        let pty = native_pty_system();
        let pair = pty
            .openpty(PtySize { rows: 24, cols: 80, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| SessionError::Pty(e.to_string()))?;

        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string());
        let mut cmd = CommandBuilder::new(&shell);
        cmd.env("TERM", "xterm-256color");
        if let Some(cwd) = cwd {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| SessionError::Spawn(e.to_string()))?;
        drop(pair.slave);

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| SessionError::Pty(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| SessionError::Pty(e.to_string()))?;

        let session = std::sync::Arc::new(Self {
            id: id.clone(),
            shared: Mutex::new(Shared {
                ring: RingBuffer::new(MAX_SCROLLBACK_LINES, MAX_SCROLLBACK_BYTES),
                client: None,
                generation: 0,
            }),
            writer: Mutex::new(writer),
            child: Mutex::new(child),
            _master: Mutex::new(pair.master),
        });

        // Blocking read pump on a plain thread (PTY reads have no async
        // story); exits when the child closes its side.
        let pump = std::sync::Arc::downgrade(&session);
        thread::Builder::new()
            .name(format!("pty-{id}"))
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            let Some(session) = pump.upgrade() else { break };
                            session.deliver(&buf[..n]);
                        }
                    }
                }
                debug!(session = %id, "pty output stream closed");
                on_exit(id);
            })
            .map_err(|e| SessionError::Spawn(e.to_string()))?;

        Ok(session)
    }

    /// Route one output chunk: scrollback always, live client if present.
    fn deliver(&self, chunk: &[u8]) {
        let tap = {
            let mut shared = self.shared.lock();
            shared.ring.push(chunk);
            shared.client.as_ref().map(|(_, tap)| tap.clone())
        };
        if let Some(tap) = tap {
            // A closed receiver just means the client went away between
            // detach and this chunk; scrollback already has the bytes.
            let _ = tap.send(chunk.to_vec());
        }
    }

    /// Install `tap` as the attached client, returning the scrollback
    /// it must replay first plus a token naming this attach. Replaces
    /// any previous client.
    pub fn attach(&self, tap: mpsc::UnboundedSender<Vec<u8>>) -> (Vec<String>, u64) {
        let mut shared = self.shared.lock();
        shared.generation += 1;
        let token = shared.generation;
        let history = shared.ring.snapshot();
        shared.client = Some((token, tap));
        (history, token)
    }

    /// Remove the attached client; child and scrollback persist.
    pub fn detach(&self) {
        self.shared.lock().client = None;
    }

    /// Detach only if `token` still names the attached client. A
    /// connection that lingered past its replacement must not evict
    /// the new one.
    pub fn detach_if(&self, token: u64) {
        let mut shared = self.shared.lock();
        if shared.client.as_ref().is_some_and(|(t, _)| *t == token) {
            shared.client = None;
        }
    }

    /// Forward client input to the PTY.
    pub fn write_input(&self, bytes: &[u8]) -> Result<(), SessionError> {
        let mut writer = self.writer.lock();
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Pid of the shell child, if the platform exposes it.
    pub fn child_pid(&self) -> Option<u32> {
        self.child.lock().process_id()
    }

    /// Kill the child; used only at daemon shutdown.
    pub fn kill(&self) {
        if let Err(e) = self.child.lock().kill() {
            warn!(session = %self.id, error = %e, "failed to kill pty child");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
