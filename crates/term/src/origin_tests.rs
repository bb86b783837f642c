// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn allow(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_allow_list_accepts_everything() {
    assert!(origin_allowed(&[], Some("https://evil.example")));
    assert!(origin_allowed(&[], None));
}

#[test]
fn exact_match_is_accepted() {
    let allowed = allow(&["https://board.example"]);
    assert!(origin_allowed(&allowed, Some("https://board.example")));
}

#[test]
fn non_matching_origin_is_rejected() {
    let allowed = allow(&["https://board.example"]);
    assert!(!origin_allowed(&allowed, Some("https://other.example")));
}

#[test]
fn missing_origin_is_rejected_when_restricted() {
    let allowed = allow(&["https://board.example"]);
    assert!(!origin_allowed(&allowed, None));
}

#[yare::parameterized(
    plain_localhost = { "http://localhost" },
    localhost_port  = { "http://localhost:5173" },
    loopback_v4     = { "http://127.0.0.1:8080" },
    loopback_v6     = { "http://[::1]:8080" },
)]
fn localhost_always_passes_when_restricted(origin: &str) {
    let allowed = allow(&["https://board.example"]);
    assert!(origin_allowed(&allowed, Some(origin)));
}

#[test]
fn lookalike_host_is_rejected() {
    let allowed = allow(&["https://board.example"]);
    assert!(!origin_allowed(&allowed, Some("http://localhost.evil.example")));
}
