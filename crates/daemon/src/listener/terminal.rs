// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal attach: the connection-upgrading request.
//!
//! After `TerminalAttachReady` the connection stops carrying requests;
//! both directions switch to [`TermFrame`] messages. History frames go
//! out first (one per buffered line), then live output. Input frames
//! are pumped on a separate task so a quiet client never stalls output
//! and a mid-frame disconnect never corrupts the stream.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use nv_core::ErrorKind;
use nv_term::{origin_allowed, SessionId};
use nv_wire::{Response, TermFrame};

use super::{ConnectionError, ConnectionSource, ListenCtx};
use crate::env;

pub(super) async fn handle_attach<R, W>(
    session_id: String,
    origin: Option<String>,
    source: ConnectionSource,
    mut reader: R,
    mut writer: W,
    ctx: &Arc<ListenCtx>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // Local socket clients are trusted; network clients face the gate.
    if source == ConnectionSource::Tcp && !origin_allowed(&ctx.allowed_origins, origin.as_deref())
    {
        let resp = Response::error(ErrorKind::Validation, "origin not allowed");
        nv_wire::write_msg(&mut writer, &resp, env::ipc_timeout()).await?;
        return Ok(());
    }

    let id = SessionId::from_string(session_id);
    let (tap_tx, mut tap_rx) = mpsc::unbounded_channel();
    let attached = match ctx.mux.attach(&id, tap_tx) {
        Ok(attached) => attached,
        Err(e) => {
            let resp = Response::error(e.kind(), e.to_string());
            nv_wire::write_msg(&mut writer, &resp, env::ipc_timeout()).await?;
            return Ok(());
        }
    };

    let ready = Response::TerminalAttachReady { session_id: id.to_string() };
    nv_wire::write_msg(&mut writer, &ready, env::ipc_timeout()).await?;

    // Scrollback replay comes before any live output frame.
    for line in attached.history {
        let frame = TermFrame::History { line };
        nv_wire::write_msg(&mut writer, &frame, env::ipc_timeout()).await?;
    }

    // Client → PTY pump.
    let mux = ctx.mux.clone();
    let input_id = id.clone();
    let mut input_task = tokio::spawn(async move {
        loop {
            let payload = match nv_wire::read_message(&mut reader).await {
                Ok(payload) => payload,
                Err(_) => break,
            };
            match nv_wire::decode::<TermFrame>(&payload) {
                Ok(TermFrame::Input { data }) => {
                    if let Err(e) = mux.write_input(&input_id, data.as_bytes()) {
                        warn!(session = %input_id, error = %e, "input write failed");
                        break;
                    }
                }
                Ok(_) => {} // clients only send input frames
                Err(e) => debug!(session = %input_id, error = %e, "ignoring malformed frame"),
            }
        }
    });

    // PTY → client pump, until the client or the session goes away.
    loop {
        tokio::select! {
            _ = &mut input_task => break,
            out = tap_rx.recv() => match out {
                Some(bytes) => {
                    let frame = TermFrame::Output {
                        data: String::from_utf8_lossy(&bytes).into_owned(),
                    };
                    if nv_wire::write_msg(&mut writer, &frame, env::ipc_timeout()).await.is_err() {
                        break;
                    }
                }
                // Tap dropped: session ended or another client attached.
                None => break,
            },
        }
    }

    input_task.abort();
    ctx.mux.detach_tap(&id, attached.token);
    debug!(session = %id, "terminal client detached");
    Ok(())
}
