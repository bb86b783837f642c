// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session table.
//!
//! Clients hold session ids, never sessions. Sessions are created
//! lazily on first attach and removed only when their child exits (or
//! at daemon shutdown). Repository switches do not touch the table:
//! terminals are independent of the active repository.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;

use nv_core::ErrorKind;

use crate::session::{Session, SessionError, SessionId};

/// Errors from multiplexer operations.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("no such terminal session: {id}")]
    NotFound { id: SessionId },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AttachError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttachError::NotFound { .. } => ErrorKind::NotFound,
            AttachError::Session(_) => ErrorKind::External,
        }
    }
}

/// Result of a successful attach.
pub struct Attached {
    /// Scrollback to replay, one entry per buffered line, before any
    /// live output arrives on the tap.
    pub history: Vec<String>,
    /// Shell child pid, when known.
    pub child_pid: Option<u32>,
    /// Names this attach for [`TermMux::detach_tap`].
    pub token: u64,
}

struct MuxInner {
    sessions: Mutex<HashMap<SessionId, Arc<Session>>>,
    /// Working directory for newly created shells (the active repo).
    cwd: Mutex<Option<PathBuf>>,
}

/// Process-wide owner of all terminal sessions.
#[derive(Clone)]
pub struct TermMux {
    inner: Arc<MuxInner>,
}

impl Default for TermMux {
    fn default() -> Self {
        Self::new()
    }
}

impl TermMux {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MuxInner {
                sessions: Mutex::new(HashMap::new()),
                cwd: Mutex::new(None),
            }),
        }
    }

    /// Directory new shells start in. Existing sessions are unaffected.
    pub fn set_cwd(&self, cwd: Option<PathBuf>) {
        *self.inner.cwd.lock() = cwd;
    }

    /// Allocate a fresh session id. The shell is spawned on first attach.
    pub fn open(&self) -> SessionId {
        SessionId::new()
    }

    /// Bind `tap` as the session's client, creating the session if this
    /// id has never been attached. Returns the scrollback to replay.
    pub fn attach(
        &self,
        id: &SessionId,
        tap: mpsc::UnboundedSender<Vec<u8>>,
    ) -> Result<Attached, AttachError> {
        let session = self.get_or_spawn(id)?;
        let (history, token) = session.attach(tap);
        Ok(Attached { history, child_pid: session.child_pid(), token })
    }

    /// Unbind the client. Child and scrollback persist.
    pub fn detach(&self, id: &SessionId) -> Result<(), AttachError> {
        self.get(id)?.detach();
        Ok(())
    }

    /// Unbind only if `token` still names the bound client; used by
    /// connection handlers racing a replacement attach.
    pub fn detach_tap(&self, id: &SessionId, token: u64) {
        if let Ok(session) = self.get(id) {
            session.detach_if(token);
        }
    }

    /// Forward client input to the session's PTY.
    pub fn write_input(&self, id: &SessionId, bytes: &[u8]) -> Result<(), AttachError> {
        self.get(id)?.write_input(bytes)?;
        Ok(())
    }

    /// Shell child pid of a live session.
    pub fn child_pid(&self, id: &SessionId) -> Result<Option<u32>, AttachError> {
        Ok(self.get(id)?.child_pid())
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.lock().len()
    }

    /// Kill every child. Only for daemon shutdown; sessions otherwise
    /// outlive any client.
    pub fn shutdown(&self) {
        let sessions: Vec<Arc<Session>> =
            self.inner.sessions.lock().values().cloned().collect();
        let count = sessions.len();
        for session in sessions {
            session.kill();
        }
        if count > 0 {
            info!(count, "killed terminal sessions on shutdown");
        }
    }

    fn get(&self, id: &SessionId) -> Result<Arc<Session>, AttachError> {
        self.inner
            .sessions
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| AttachError::NotFound { id: id.clone() })
    }

    fn get_or_spawn(&self, id: &SessionId) -> Result<Arc<Session>, AttachError> {
        let mut sessions = self.inner.sessions.lock();
        if let Some(session) = sessions.get(id) {
            return Ok(session.clone());
        }
        let cwd = self.inner.cwd.lock().clone();
        let reaper: Weak<MuxInner> = Arc::downgrade(&self.inner);
        let session = Session::spawn(id.clone(), cwd, move |id| {
            if let Some(inner) = reaper.upgrade() {
                inner.sessions.lock().remove(&id);
                info!(session = %id, "terminal session ended");
            }
        })?;
        sessions.insert(id.clone(), session.clone());
        Ok(session)
    }
}

#[cfg(test)]
#[path = "mux_tests.rs"]
mod tests;
