// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, background maintenance, shutdown.

mod startup;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::RepoRegistry;
use crate::env;
use crate::listener::{ListenCtx, Listener};

pub use startup::LifecycleError;

/// Run the daemon until a shutdown request arrives.
pub async fn run() -> Result<(), LifecycleError> {
    let state_dir = env::state_dir()?;
    std::fs::create_dir_all(&state_dir)?;
    let _log_guard = startup::init_tracing(&state_dir);

    let socket_path = state_dir.join("nvd.sock");
    let unix = startup::claim_socket(&socket_path).await?;
    let pid_file = startup::write_pid_file(&state_dir)?;

    let registry = RepoRegistry::load(&env::config_dir()?)
        .map_err(|e| LifecycleError::Registry(e.to_string()))?;
    let ctx = Arc::new(ListenCtx::new(registry));

    // Active repository: registry first, cwd walk as the fallback.
    let active_root = {
        let repos = ctx.repos.lock();
        repos.active().map(|r| r.path.clone())
    };
    match active_root {
        Some(root) => ctx.install_repo(&root),
        None => match std::env::current_dir().ok().and_then(|cwd| crate::config::detect_repository(&cwd)) {
            Some(root) => {
                info!(repo = %root.display(), "no registered repository; detected from cwd");
                ctx.install_repo(&root);
            }
            None => warn!("no active repository; waiting for one to be added"),
        },
    }

    let tcp = match env::tcp_port() {
        Some(port) => Some(
            TcpListener::bind(("127.0.0.1", port))
                .await
                .map_err(LifecycleError::Io)?,
        ),
        None => None,
    };

    let maintenance = tokio::spawn(maintenance_loop(Arc::clone(&ctx)));
    let listener = tokio::spawn(Listener::new(unix, tcp, Arc::clone(&ctx)).run());

    info!(version = env::PROTOCOL_VERSION, socket = %socket_path.display(), "nvd ready");
    ctx.shutdown.notified().await;

    // Let in-flight responses drain before tearing the world down.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    listener.abort();
    maintenance.abort();
    ctx.mux.shutdown();
    drop(pid_file);
    let _ = std::fs::remove_file(&socket_path);
    info!("nvd stopped");
    Ok(())
}

/// Periodic hygiene: purge old task/plan backups, prune the worktree
/// registry. Failures are logged and retried next tick.
async fn maintenance_loop(ctx: Arc<ListenCtx>) {
    let mut interval = tokio::time::interval(env::maintenance_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(engine) = ctx.engine() else { continue };

        let retention = env::backup_retention();
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let task_path = engine.store().path().to_path_buf();
        let plan_path = engine.repo_root().join(nv_core::repo::PLAN_FILE);
        for path in [task_path, plan_path] {
            match nv_storage::purge_old_backups(&path, retention, now) {
                Ok(0) => {}
                Ok(n) => info!(path = %path.display(), removed = n, "purged old backups"),
                Err(e) => warn!(path = %path.display(), error = %e, "backup purge failed"),
            }
        }

        if let Err(e) = engine.maintain().await {
            warn!(error = %e, "pool maintenance failed");
        }
    }
}
