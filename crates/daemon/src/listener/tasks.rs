// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task, plan, and pool request handlers.

use nv_core::{ErrorKind, Task, TaskStatus};
use nv_engine::EngineError;
use nv_wire::Response;

use super::{no_active_repo, ListenCtx};

fn err(e: EngineError) -> Response {
    Response::error(e.kind(), e.to_string())
}

pub(super) fn handle_list(ctx: &ListenCtx) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.list_tasks() {
        Ok(tasks) => Response::Tasks { tasks },
        Err(e) => err(e),
    }
}

pub(super) fn handle_save(ctx: &ListenCtx, tasks: Vec<Task>) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.save_tasks(&tasks) {
        Ok(()) => Response::Ok,
        Err(e) => err(e),
    }
}

pub(super) fn handle_update(ctx: &ListenCtx, task: Task) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.update_task(task) {
        Ok(()) => Response::Ok,
        Err(e) => err(e),
    }
}

pub(super) async fn handle_move(ctx: &ListenCtx, id: u64, status: &str) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    let status = match status.parse::<TaskStatus>() {
        Ok(status) => status,
        Err(e) => return Response::error(ErrorKind::Validation, e.to_string()),
    };
    match engine.move_task(id, status).await {
        Ok(task) => Response::Task { task },
        Err(e) => err(e),
    }
}

pub(super) fn handle_read_plan(ctx: &ListenCtx) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.read_plan() {
        Ok(content) => Response::Plan { content },
        Err(e) => err(e),
    }
}

pub(super) fn handle_write_plan(ctx: &ListenCtx, content: &str) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.write_plan(content) {
        Ok(()) => Response::Ok,
        Err(e) => err(e),
    }
}

pub(super) fn handle_pool_status(ctx: &ListenCtx) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.pool_status() {
        Ok(status) => Response::Pool { status },
        Err(e) => err(e),
    }
}
