// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notifications, strictly best-effort.
//!
//! Used when a task reaches review: the supervisor is desktop-resident
//! and the user may be elsewhere while agents run.

use tracing::debug;

/// Fire-and-forget user notification.
pub trait NotifyAdapter: Send + Sync {
    fn notify(&self, summary: &str, body: &str);
}

/// Sends through the platform notification service. Failures are logged
/// and swallowed; notification delivery never gates the pipeline.
pub struct DesktopNotifier;

impl NotifyAdapter for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) {
        let result = notify_rust::Notification::new()
            .summary(summary)
            .body(body)
            .appname("navvy")
            .show();
        if let Err(e) = result {
            debug!(error = %e, "desktop notification failed");
        }
    }
}

/// Discards notifications; used headless and in tests.
pub struct NoopNotifier;

impl NotifyAdapter for NoopNotifier {
    fn notify(&self, _summary: &str, _body: &str) {}
}
