// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv repo` — the repository registry.

use std::path::PathBuf;

use clap::Subcommand;

use nv_wire::{RepoSummary, Request, Response};

use crate::client::{ClientError, DaemonClient};
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum RepoCommand {
    /// List registered repositories
    List,
    /// Register a repository (must contain plan/task.json)
    Add { path: PathBuf },
    /// Remove a repository from the registry
    Rm { id: String },
    /// Make a repository active
    Switch { id: String },
    /// Show the active repository
    Active,
    /// Check whether a path is a usable repository
    Validate { path: PathBuf },
}

fn print_repo(repo: &RepoSummary) {
    let marker = if repo.active { "*" } else { " " };
    println!("{marker} {}  {}  {}", repo.id, repo.name, repo.path);
}

pub async fn run(command: RepoCommand) -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    match command {
        RepoCommand::List => match client.send(&Request::ListRepositories).await? {
            Response::Repositories { repos } => {
                if repos.is_empty() {
                    println!("no repositories registered");
                }
                for repo in &repos {
                    print_repo(repo);
                }
            }
            _ => return Err(ClientError::Unexpected.into()),
        },
        RepoCommand::Add { path } => match client.send(&Request::AddRepository { path }).await? {
            Response::Repository { repo: Some(repo) } => print_repo(&repo),
            _ => return Err(ClientError::Unexpected.into()),
        },
        RepoCommand::Rm { id } => match client.send(&Request::RemoveRepository { id }).await? {
            Response::Ok => println!("removed"),
            _ => return Err(ClientError::Unexpected.into()),
        },
        RepoCommand::Switch { id } => {
            match client.send(&Request::SwitchRepository { id }).await? {
                Response::Repository { repo: Some(repo) } => print_repo(&repo),
                _ => return Err(ClientError::Unexpected.into()),
            }
        }
        RepoCommand::Active => match client.send(&Request::ActiveRepository).await? {
            Response::Repository { repo: Some(repo) } => print_repo(&repo),
            Response::Repository { repo: None } => println!("no active repository"),
            _ => return Err(ClientError::Unexpected.into()),
        },
        RepoCommand::Validate { path } => {
            match client.send(&Request::ValidateRepository { path }).await? {
                Response::RepoValidation { valid: true, task_count } => {
                    println!("valid repository with {task_count} tasks");
                }
                Response::RepoValidation { valid: false, .. } => {
                    return Err(ExitError::new(2, "not a valid repository"));
                }
                _ => return Err(ClientError::Unexpected.into()),
            }
        }
    }
    Ok(())
}
