// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv plan` — the free-form plan document.

use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;

use nv_wire::{Request, Response};

use crate::client::{ClientError, DaemonClient};
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum PlanCommand {
    /// Print the plan document
    Show,
    /// Overwrite the plan from a file, or stdin when no file is given
    Write { file: Option<PathBuf> },
}

pub async fn run(command: PlanCommand) -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    match command {
        PlanCommand::Show => {
            match client.send(&Request::ReadPlan).await? {
                Response::Plan { content } => print!("{content}"),
                _ => return Err(ClientError::Unexpected.into()),
            }
        }
        PlanCommand::Write { file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                    ExitError::new(1, format!("cannot read {}: {e}", path.display()))
                })?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .map_err(|e| ExitError::new(1, format!("cannot read stdin: {e}")))?;
                    buf
                }
            };
            match client.send(&Request::WritePlan { content }).await? {
                Response::Ok => println!("plan written"),
                _ => return Err(ClientError::Unexpected.into()),
            }
        }
    }
    Ok(())
}
