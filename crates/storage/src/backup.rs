// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamped backup copies with age-based retention.
//!
//! Backups are siblings of the original named `<file>.<stamp>.bak`
//! (e.g. `task.json.20260801-121530.bak`). The stamp is UTC so names
//! sort in time order regardless of host timezone.

use chrono::NaiveDateTime;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nv_core::time_fmt::backup_stamp;

const BAK_SUFFIX: &str = ".bak";
const STAMP_FMT: &str = "%Y%m%d-%H%M%S";

/// Copy `path` to a timestamped sibling. Returns the backup path, or
/// `None` if the original does not exist yet.
pub fn create_backup(path: &Path, epoch_secs: u64) -> io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path, epoch_secs);
    std::fs::copy(path, &backup)?;
    Ok(Some(backup))
}

/// Delete backups of `path` older than `retention`. Returns how many
/// were removed. Unparseable names are left alone.
pub fn purge_old_backups(path: &Path, retention: Duration, now_epoch: u64) -> io::Result<usize> {
    let Some(dir) = path.parent() else {
        return Ok(0);
    };
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Ok(0);
    };
    let prefix = format!("{file_name}.");

    let cutoff = now_epoch.saturating_sub(retention.as_secs());
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(stamp) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(BAK_SUFFIX))
        else {
            continue;
        };
        let Some(epoch) = parse_stamp(stamp) else {
            continue;
        };
        if epoch < cutoff {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                // Lost a race with another purge; nothing to do.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
    }
    Ok(removed)
}

fn backup_path(path: &Path, epoch_secs: u64) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamped = format!("{name}.{}{BAK_SUFFIX}", backup_stamp(epoch_secs));
    path.with_file_name(stamped)
}

fn parse_stamp(stamp: &str) -> Option<u64> {
    let dt = NaiveDateTime::parse_from_str(stamp, STAMP_FMT).ok()?;
    let secs = dt.and_utc().timestamp();
    (secs >= 0).then_some(secs as u64)
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
