// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv review` — the human gate on agent work.

use clap::Subcommand;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Merge the task branch into the mainline and close the task
    Approve { id: u64 },
    /// Discard the task branch and close the task as not merged
    Reject { id: u64 },
}

pub async fn run(command: ReviewCommand) -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    match command {
        ReviewCommand::Approve { id } => {
            let task = client.approve(id).await?;
            println!("merged task #{}: {}", task.id, task.title);
        }
        ReviewCommand::Reject { id } => {
            let task = client.reject_task(id).await?;
            println!("rejected task #{}: {}", task.id, task.title);
        }
    }
    Ok(())
}
