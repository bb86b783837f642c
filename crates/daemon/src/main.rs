// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nvd` binary entry point.

#[tokio::main]
async fn main() {
    if let Err(e) = nv_daemon::run().await {
        eprintln!("nvd: {e}");
        std::process::exit(1);
    }
}
