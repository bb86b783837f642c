// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn prompt_carries_the_working_contract() {
    let prompt = build_prompt(7, "Fix login", Path::new("/repos/widget"));

    assert!(prompt.contains("task #7: Fix login"));
    assert!(prompt.contains("plan/plan.md"));
    assert!(prompt.contains("plan/task.json"));
    assert!(prompt.contains("task_7"), "names the task branch");
    assert!(prompt.contains("/repos/widget/plan/task.json"), "mainline task file path");
    assert!(prompt.contains("pending_review"));
}

#[test]
fn prompt_forbids_branch_switching() {
    let prompt = build_prompt(1, "T", Path::new("/r"));
    assert!(prompt.contains("Do not switch branches"));
}
