// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv term` — terminal sessions.
//!
//! Attach puts the local terminal into raw mode and pumps bytes both
//! ways; Ctrl-] detaches, leaving the remote shell running.

use std::io::Write;

use clap::Subcommand;
use tokio::sync::mpsc;

use nv_wire::{Request, Response, TermFrame};

use crate::client::{ClientError, DaemonClient};
use crate::exit_error::ExitError;

/// Detach key: Ctrl-].
const DETACH_BYTE: u8 = 0x1d;

#[derive(Subcommand)]
pub enum TermCommand {
    /// Allocate a new session id
    Open,
    /// Attach to a session (created on first attach)
    Attach { session_id: String },
}

pub async fn run(command: TermCommand) -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    match command {
        TermCommand::Open => match client.send(&Request::OpenTerminal).await? {
            Response::TerminalOpened { session_id } => println!("{session_id}"),
            _ => return Err(ClientError::Unexpected.into()),
        },
        TermCommand::Attach { session_id } => attach(&client, session_id).await?,
    }
    Ok(())
}

async fn attach(client: &DaemonClient, session_id: String) -> Result<(), ExitError> {
    let timeout = std::time::Duration::from_secs(10);
    let mut stream = client.open_stream().await?;

    nv_wire::write_msg(&mut stream, &Request::AttachTerminal { session_id, origin: None }, timeout)
        .await
        .map_err(|e| ExitError::new(1, e.to_string()))?;
    match nv_wire::read_msg::<_, Response>(&mut stream, timeout).await {
        Ok(Response::TerminalAttachReady { .. }) => {}
        Ok(Response::Error { kind, message }) => return Err(ExitError::from_daemon(kind, message)),
        Ok(_) => return Err(ClientError::Unexpected.into()),
        Err(e) => return Err(ExitError::new(1, e.to_string())),
    }

    // Raw mode for the duration of the attach; restored on drop. A
    // non-tty stdin (piped input) just skips raw mode.
    let _raw = RawMode::enable().ok();
    eprint!("attached; Ctrl-] detaches\r\n");

    // Blocking stdin reads happen on a plain thread.
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    std::thread::spawn(move || {
        use std::io::Read;
        let mut stdin = std::io::stdin();
        let mut buf = [0u8; 1024];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if input_tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Daemon → stdout pump on its own task so an input write never
    // interrupts a frame read mid-way.
    let (mut read_half, mut write_half) = stream.into_split();
    let mut output_task = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        loop {
            let payload = match nv_wire::read_message(&mut read_half).await {
                Ok(payload) => payload,
                Err(_) => break, // daemon closed the stream
            };
            match nv_wire::decode::<TermFrame>(&payload) {
                Ok(TermFrame::History { line }) => {
                    let _ = write!(stdout, "{line}\r\n");
                    let _ = stdout.flush();
                }
                Ok(TermFrame::Output { data }) => {
                    let _ = stdout.write_all(data.as_bytes());
                    let _ = stdout.flush();
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut output_task => break,
            input = input_rx.recv() => match input {
                Some(bytes) => {
                    if bytes.contains(&DETACH_BYTE) {
                        break;
                    }
                    let frame = TermFrame::Input {
                        data: String::from_utf8_lossy(&bytes).into_owned(),
                    };
                    if nv_wire::write_msg(&mut write_half, &frame, timeout).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    output_task.abort();

    eprint!("\r\ndetached\r\n");
    Ok(())
}

/// Puts the controlling terminal into raw mode, restoring the original
/// settings on drop.
struct RawMode {
    original: nix::sys::termios::Termios,
}

impl RawMode {
    fn enable() -> nix::Result<Self> {
        let stdin = std::io::stdin();
        let original = nix::sys::termios::tcgetattr(&stdin)?;
        let mut raw = original.clone();
        nix::sys::termios::cfmakeraw(&mut raw);
        nix::sys::termios::tcsetattr(&stdin, nix::sys::termios::SetArg::TCSANOW, &raw)?;
        Ok(Self { original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = nix::sys::termios::tcsetattr(
            &std::io::stdin(),
            nix::sys::termios::SetArg::TCSANOW,
            &self.original,
        );
    }
}
