// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv daemon` — daemon process control.

use std::time::Duration;

use clap::Subcommand;

use nv_wire::{Request, Response};

use crate::client::{ClientError, DaemonClient};
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon in the background
    Start,
    /// Ask the daemon to shut down
    Stop,
    /// Show daemon status
    Status,
    /// Health check
    Ping,
}

pub async fn run(command: DaemonCommand) -> Result<(), ExitError> {
    match command {
        DaemonCommand::Start => start().await,
        DaemonCommand::Stop => {
            let client = DaemonClient::connect()?;
            match client.send(&Request::Shutdown).await? {
                Response::ShuttingDown => {
                    println!("daemon stopping");
                    Ok(())
                }
                _ => Err(ClientError::Unexpected.into()),
            }
        }
        DaemonCommand::Status => {
            let client = DaemonClient::connect()?;
            match client.send(&Request::Status).await? {
                Response::Status { status } => {
                    println!("version:   {}", status.version);
                    println!("uptime:    {}", nv_core::format_elapsed(status.uptime_secs));
                    println!("busy:      {} workers", status.busy_workers);
                    println!("terminals: {}", status.terminal_sessions);
                    match status.repo {
                        Some(repo) => println!("repo:      {repo}"),
                        None => println!("repo:      (none)"),
                    }
                    Ok(())
                }
                _ => Err(ClientError::Unexpected.into()),
            }
        }
        DaemonCommand::Ping => {
            let client = DaemonClient::connect()?;
            match client.send(&Request::Ping).await? {
                Response::Pong => {
                    println!("pong");
                    Ok(())
                }
                _ => Err(ClientError::Unexpected.into()),
            }
        }
    }
}

/// Spawn `nvd` detached and wait for it to answer pings.
async fn start() -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    if client.send(&Request::Ping).await.is_ok() {
        println!("daemon already running");
        return Ok(());
    }

    let nvd = find_nvd();
    std::process::Command::new(&nvd)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ExitError::new(1, format!("cannot start {}: {e}", nvd.display())))?;

    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if client.send(&Request::Ping).await.is_ok() {
            println!("daemon started");
            return Ok(());
        }
    }
    Err(ExitError::new(1, "daemon did not come up within 5s"))
}

/// Prefer the `nvd` that shipped beside this `nv` binary; fall back to
/// whatever is on PATH.
fn find_nvd() -> std::path::PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("nvd");
            if sibling.is_file() {
                return sibling;
            }
        }
    }
    std::path::PathBuf::from("nvd")
}
