// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    input   = { TermFrame::Input { data: "ls\n".into() }, "input" },
    output  = { TermFrame::Output { data: "file.txt\n".into() }, "output" },
    history = { TermFrame::History { line: "$ ls".into() }, "history" },
)]
fn frames_are_snake_case_tagged(frame: TermFrame, tag: &str) {
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], tag);

    let parsed: TermFrame = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, frame);
}

#[test]
fn repo_summary_roundtrips() {
    let repo = RepoSummary {
        id: "r1".into(),
        name: "widget".into(),
        path: "/home/u/widget".into(),
        active: true,
    };
    let json = serde_json::to_string(&repo).unwrap();
    let parsed: RepoSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, repo);
}
