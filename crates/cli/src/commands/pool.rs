// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nv pool` — worktree pool status.

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output;

pub async fn run() -> Result<(), ExitError> {
    let client = DaemonClient::connect()?;
    let status = client.pool_status().await?;
    print!("{}", output::render_pool(&status));
    Ok(())
}
