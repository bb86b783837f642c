// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Origin gate for network-originated terminal attaches.
//!
//! Local socket clients are trusted and never checked. Network clients
//! declare an origin; with an empty allow-list everything passes
//! (unrestricted mode), otherwise only exact matches and localhost.

/// Whether a declared origin may attach.
pub fn origin_allowed(allowed: &[String], origin: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let Some(origin) = origin else {
        return false;
    };
    allowed.iter().any(|a| a == origin) || is_localhost(origin)
}

fn is_localhost(origin: &str) -> bool {
    let rest = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .unwrap_or(origin);
    let host = match rest.strip_prefix('[') {
        // Bracketed IPv6 literal: take everything up to the bracket.
        Some(v6) => v6.split(']').next().unwrap_or(v6),
        None => rest.split([':', '/']).next().unwrap_or(rest),
    };
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
#[path = "origin_tests.rs"]
mod tests;
