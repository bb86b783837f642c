// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nv-wire: IPC protocol between clients and the daemon.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.
//! After a `TerminalAttachReady` response the same connection switches
//! to carrying [`TermFrame`] messages in both directions.

mod request;
mod response;
mod types;
mod wire;

pub use request::Request;
pub use response::Response;
pub use types::{RepoSummary, StatusSummary, TermFrame};

// Payload types clients need to name without a direct nv-pool dep.
pub use nv_pool::{PoolStatus, WorkerState, WorkerStatus};
pub use wire::{
    decode, encode, read_message, read_msg, write_message, write_msg, ProtocolError,
};
