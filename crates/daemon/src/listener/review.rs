// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Review request handlers: the human approve/reject gate.

use nv_wire::Response;

use super::{no_active_repo, ListenCtx};

pub(super) async fn handle_approve(ctx: &ListenCtx, id: u64) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.approve(id).await {
        Ok(task) => Response::Task { task },
        Err(e) => Response::error(e.kind(), e.to_string()),
    }
}

pub(super) async fn handle_reject(ctx: &ListenCtx, id: u64) -> Response {
    let Some(engine) = ctx.engine() else { return no_active_repo() };
    match engine.reject(id).await {
        Ok(task) => Response::Task { task },
        Err(e) => Response::error(e.kind(), e.to_string()),
    }
}
