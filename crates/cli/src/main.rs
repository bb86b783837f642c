// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv`: client for the navvy daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};

use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "nv", version, about = "Kanban-driven supervisor for coding agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect and mutate the task board
    Task {
        #[command(subcommand)]
        command: commands::task::TaskCommand,
    },
    /// Approve or reject agent work awaiting review
    Review {
        #[command(subcommand)]
        command: commands::review::ReviewCommand,
    },
    /// Show worktree pool status
    Pool,
    /// Read or overwrite the plan document
    Plan {
        #[command(subcommand)]
        command: commands::plan::PlanCommand,
    },
    /// Open and attach terminal sessions
    Term {
        #[command(subcommand)]
        command: commands::term::TermCommand,
    },
    /// Manage the repository registry
    Repo {
        #[command(subcommand)]
        command: commands::repo::RepoCommand,
    },
    /// Control the daemon process
    Daemon {
        #[command(subcommand)]
        command: commands::daemon::DaemonCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Task { command } => commands::task::run(command).await,
        Command::Review { command } => commands::review::run(command).await,
        Command::Pool => commands::pool::run().await,
        Command::Plan { command } => commands::plan::run(command).await,
        Command::Term { command } => commands::term::run(command).await,
        Command::Repo { command } => commands::repo::run(command).await,
        Command::Daemon { command } => commands::daemon::run(command).await,
    };
    if let Err(e) = result {
        eprintln!("nv: {}", e.message);
        std::process::exit(e.code);
    }
}
