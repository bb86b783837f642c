// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable time formatting for lease records and status output.

use chrono::{DateTime, Local, Utc};

/// Format elapsed seconds as a compact duration: `42s`, `3m12s`, `2h05m`.
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format epoch seconds as a local wall-clock timestamp.
///
/// Used for the `started_human` lease key; strictly informational, the
/// machine-readable `started` field is authoritative.
pub fn human_timestamp(epoch_secs: u64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_secs as i64, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_secs.to_string(),
    }
}

/// Timestamp suffix for backup file names: `20260801-121530`.
pub fn backup_stamp(epoch_secs: u64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_secs as i64, 0) {
        Some(dt) => dt.format("%Y%m%d-%H%M%S").to_string(),
        None => epoch_secs.to_string(),
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
