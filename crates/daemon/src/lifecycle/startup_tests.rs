// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn claim_fresh_socket() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nvd.sock");
    let _listener = claim_socket(&path).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn stale_socket_file_is_evicted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nvd.sock");
    // A socket file nobody listens on.
    drop(UnixListener::bind(&path).unwrap());
    assert!(path.exists());

    let _listener = claim_socket(&path).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn live_daemon_wins_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nvd.sock");
    let _live = UnixListener::bind(&path).unwrap();

    let err = claim_socket(&path).await.unwrap_err();
    assert!(matches!(err, LifecycleError::AlreadyRunning { .. }));
}

#[test]
fn pid_file_is_removed_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let pid_path = dir.path().join("nvd.pid");

    let pid_file = write_pid_file(dir.path()).unwrap();
    let written = std::fs::read_to_string(&pid_path).unwrap();
    assert_eq!(written.trim().parse::<u32>().unwrap(), std::process::id());

    drop(pid_file);
    assert!(!pid_path.exists());
}
