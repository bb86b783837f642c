// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease record I/O.
//!
//! The record lives inside its workspace so discovery is a directory
//! scan. A record that fails to parse is reported as corrupt and gets
//! reclaimed like any other stale lease.

use std::io;
use std::path::{Path, PathBuf};

use nv_core::{Lease, LEASE_FILE};

/// Where a workspace keeps its lease record.
pub fn lease_path(workspace: &Path) -> PathBuf {
    workspace.join(LEASE_FILE)
}

/// Outcome of reading a workspace's lease slot.
#[derive(Debug)]
pub enum LeaseRead {
    Idle,
    Busy(Lease),
    /// Record exists but does not parse; treated as stale.
    Corrupt { error: String },
}

/// Read the lease record of workspace `worker`.
pub fn read_lease(workspace: &Path, worker: u32) -> io::Result<LeaseRead> {
    let content = match std::fs::read_to_string(lease_path(workspace)) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LeaseRead::Idle),
        Err(e) => return Err(e),
    };
    match Lease::parse(worker, &content) {
        Ok(lease) => Ok(LeaseRead::Busy(lease)),
        Err(e) => Ok(LeaseRead::Corrupt { error: e.to_string() }),
    }
}

/// Write (or replace) the lease record.
pub fn write_lease(workspace: &Path, lease: &Lease) -> io::Result<()> {
    std::fs::write(lease_path(workspace), lease.to_record())
}

/// Remove the lease record; missing is fine (idempotent release).
pub fn remove_lease(workspace: &Path) -> io::Result<()> {
    match std::fs::remove_file(lease_path(workspace)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "lease_file_tests.rs"]
mod tests;
