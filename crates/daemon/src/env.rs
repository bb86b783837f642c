// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: NV_STATE_DIR > XDG_STATE_HOME/navvy > ~/.local/state/navvy
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("NV_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("navvy"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/navvy"))
}

/// Resolve config directory: NV_CONFIG_DIR > platform config dir.
pub fn config_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("NV_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("navvy"))
        .ok_or(LifecycleError::NoStateDir)
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    millis_var("NV_IPC_TIMEOUT_MS", Duration::from_secs(5))
}

/// The external coding-agent executable.
pub fn agent_cmd() -> PathBuf {
    std::env::var("NV_AGENT_CMD")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/local/bin/claude"))
}

/// Bound on pooled workspaces per repository.
pub fn max_workers() -> u32 {
    parse_var("NV_MAX_WORKERS").unwrap_or(nv_pool::DEFAULT_MAX_WORKERS)
}

/// Age past which a lease is reclaimed even with a live owner.
pub fn lease_max_age() -> Duration {
    parse_var("NV_LEASE_MAX_AGE_SECS")
        .map(Duration::from_secs)
        .unwrap_or(nv_pool::DEFAULT_LEASE_MAX_AGE)
}

/// How long a spawn may block waiting for the agent to accept.
pub fn accept_timeout() -> Duration {
    millis_var("NV_SPAWN_TIMEOUT_MS", Duration::from_secs(30))
}

/// Task-file and plan backups older than this are purged.
pub fn backup_retention() -> Duration {
    let days = parse_var("NV_BACKUP_RETENTION_DAYS").unwrap_or(7u64);
    Duration::from_secs(days * 24 * 60 * 60)
}

/// Cadence of the background maintenance pass.
pub fn maintenance_interval() -> Duration {
    parse_var("NV_MAINTENANCE_INTERVAL_SECS")
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(3600))
}

/// TCP port for remote clients. When unset, Unix socket only.
pub fn tcp_port() -> Option<u16> {
    parse_var("NV_TCP_PORT")
}

/// Origins allowed to attach terminals over TCP (comma separated).
/// Empty means unrestricted.
pub fn allowed_origins() -> Vec<String> {
    std::env::var("NV_ALLOWED_ORIGINS")
        .map(|s| {
            s.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Directories a project root must live under; empty disables the fence.
pub fn allowed_roots() -> Vec<PathBuf> {
    std::env::var("NV_ALLOWED_ROOTS")
        .map(|s| {
            s.split(':')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn millis_var(name: &str, default: Duration) -> Duration {
    parse_var(name).map(Duration::from_millis).unwrap_or(default)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
