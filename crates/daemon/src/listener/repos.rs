// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository registry handlers (the configuration collaborator).

use std::path::Path;

use nv_core::RepoRecord;
use nv_wire::{RepoSummary, Response};

use super::ListenCtx;
use crate::config::{self, ConfigError};

fn summary(record: &RepoRecord, active_id: Option<&str>) -> RepoSummary {
    RepoSummary {
        id: record.id.clone(),
        name: record.name.clone(),
        path: record.path.display().to_string(),
        active: active_id == Some(record.id.as_str()),
    }
}

fn err(e: ConfigError) -> Response {
    Response::error(e.kind(), e.to_string())
}

pub(super) fn handle_list(ctx: &ListenCtx) -> Response {
    let repos = ctx.repos.lock();
    let active = repos.active_id().map(String::from);
    Response::Repositories {
        repos: repos.list().iter().map(|r| summary(r, active.as_deref())).collect(),
    }
}

pub(super) fn handle_active(ctx: &ListenCtx) -> Response {
    let repos = ctx.repos.lock();
    let active = repos.active_id().map(String::from);
    Response::Repository {
        repo: repos.active().map(|r| summary(r, active.as_deref())),
    }
}

pub(super) fn handle_add(ctx: &ListenCtx, path: &Path) -> Response {
    let (record, became_active) = {
        let mut repos = ctx.repos.lock();
        match repos.add(path) {
            Ok(record) => {
                let became_active = repos.active_id() == Some(record.id.as_str());
                (record, became_active)
            }
            Err(e) => return err(e),
        }
    };
    if became_active {
        ctx.install_repo(&record.path);
    }
    Response::Repository { repo: Some(summary(&record, Some(record.id.as_str()))) }
}

pub(super) fn handle_remove(ctx: &ListenCtx, id: &str) -> Response {
    let next_active = {
        let mut repos = ctx.repos.lock();
        if let Err(e) = repos.remove(id) {
            return err(e);
        }
        repos.active().cloned()
    };
    match next_active {
        Some(record) => ctx.install_repo(&record.path),
        None => {
            *ctx.engine.write() = None;
            ctx.mux.set_cwd(None);
        }
    }
    Response::Ok
}

pub(super) fn handle_switch(ctx: &ListenCtx, id: &str) -> Response {
    let record = {
        let mut repos = ctx.repos.lock();
        match repos.switch(id) {
            Ok(record) => record,
            Err(e) => return err(e),
        }
    };
    ctx.install_repo(&record.path);
    Response::Repository { repo: Some(summary(&record, Some(record.id.as_str()))) }
}

pub(super) fn handle_validate(path: &Path) -> Response {
    let (valid, task_count) = config::validate_repository(path);
    Response::RepoValidation { valid, task_count }
}
