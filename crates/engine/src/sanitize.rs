// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input hardening at the agent boundary.
//!
//! Task titles end up in a subprocess argument and a prompt; the agent
//! command comes from configuration; the project root comes from the
//! repository registry. None of them are trusted.

use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

use crate::error::EngineError;

/// Longest sanitized title, in characters.
const MAX_TITLE_LEN: usize = 255;

/// Strip a title down to characters that are inert in argv, prompts,
/// and `key=value` lease records: alphanumerics, spaces, and plain
/// punctuation. Path separators, shell metacharacters, quotes, and
/// control characters are dropped.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len().min(MAX_TITLE_LEN));
    let mut kept = 0;
    for c in title.chars() {
        if kept >= MAX_TITLE_LEN {
            break;
        }
        let keep = c.is_alphanumeric()
            || c == ' '
            || matches!(c, '-' | '_' | '.' | ',' | ':' | '+' | '#' | '@');
        if keep {
            out.push(c);
            kept += 1;
        }
    }
    out.trim().to_string()
}

/// Validate the project root: must resolve to a real directory, contain
/// no traversal components, and sit under one of the allowed roots (an
/// empty allow-list disables the containment check).
pub fn validate_project_root(
    path: &Path,
    allowed_roots: &[PathBuf],
) -> Result<PathBuf, EngineError> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(EngineError::Validation {
            message: format!("project root contains traversal: {}", path.display()),
        });
    }
    let resolved = path.canonicalize().map_err(|e| EngineError::Validation {
        message: format!("project root {} does not resolve: {e}", path.display()),
    })?;
    if !resolved.is_dir() {
        return Err(EngineError::Validation {
            message: format!("project root is not a directory: {}", resolved.display()),
        });
    }
    if !allowed_roots.is_empty()
        && !allowed_roots.iter().any(|root| resolved.starts_with(root))
    {
        return Err(EngineError::Validation {
            message: format!("project root {} is outside allowed roots", resolved.display()),
        });
    }
    Ok(resolved)
}

/// Validate the agent executable: a regular file with an execute bit,
/// and — if it is a text script — an interpreter directive up front.
pub fn validate_agent_cmd(path: &Path) -> Result<(), EngineError> {
    let meta = std::fs::metadata(path).map_err(|e| EngineError::Validation {
        message: format!("agent command {}: {e}", path.display()),
    })?;
    if !meta.is_file() {
        return Err(EngineError::Validation {
            message: format!("agent command is not a regular file: {}", path.display()),
        });
    }
    if meta.permissions().mode() & 0o111 == 0 {
        return Err(EngineError::Validation {
            message: format!("agent command is not executable: {}", path.display()),
        });
    }

    let mut head = [0u8; 4];
    let n = read_head(path, &mut head).map_err(|e| EngineError::Validation {
        message: format!("agent command {}: {e}", path.display()),
    })?;
    let head = &head[..n];
    if head.starts_with(b"#!") || !looks_textual(head) {
        return Ok(());
    }
    Err(EngineError::Validation {
        message: format!(
            "agent command {} looks like a script without an interpreter directive",
            path.display()
        ),
    })
}

fn read_head(path: &Path, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::io::Read;
    let mut file = std::fs::File::open(path)?;
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Crude text/binary split: native executables open with magic bytes
/// that are not printable ASCII (0x7f for ELF, 0xfe/0xcf for Mach-O).
fn looks_textual(head: &[u8]) -> bool {
    !head.is_empty()
        && head.iter().all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace())
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
