// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy carried on the wire.
//!
//! Every facade operation resolves to success or a typed error; the kind
//! tells the client how to present it (inline for expected failures,
//! with captured output for conflicts and external command failures).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input: unknown status, malformed task, path traversal.
    Validation,
    /// Task id, workspace, or branch missing.
    NotFound,
    /// Merge conflict or a lost allocation race.
    Conflict,
    /// Agent subprocess, git command, or PTY failure.
    External,
    /// Invariant violation or recovered panic.
    Internal,
}

impl ErrorKind {
    /// Expected errors are shown inline near the offending action;
    /// unexpected ones carry captured output for the user to inspect.
    pub fn is_expected(&self) -> bool {
        matches!(self, ErrorKind::Validation | ErrorKind::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => f.write_str("validation"),
            ErrorKind::NotFound => f.write_str("not_found"),
            ErrorKind::Conflict => f.write_str("conflict"),
            ErrorKind::External => f.write_str("external"),
            ErrorKind::Internal => f.write_str("internal"),
        }
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
