// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded scrollback for terminal sessions.
//!
//! Output is split on newlines; the final element may be an unfinished
//! line that later chunks extend. Eviction drops whole lines from the
//! front until both the line bound and the byte bound hold.

use std::collections::VecDeque;

/// FIFO of recent output lines, bounded by line count and total bytes.
#[derive(Debug)]
pub struct RingBuffer {
    lines: VecDeque<Vec<u8>>,
    bytes: usize,
    max_lines: usize,
    max_bytes: usize,
    /// Whether the last line is still open (no newline seen yet).
    partial: bool,
}

impl RingBuffer {
    pub fn new(max_lines: usize, max_bytes: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            bytes: 0,
            max_lines,
            max_bytes,
            partial: false,
        }
    }

    /// Append a raw output chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        for piece in chunk.split_inclusive(|b| *b == b'\n') {
            let (content, terminated) = match piece.last() {
                Some(b'\n') => (&piece[..piece.len() - 1], true),
                _ => (piece, false),
            };
            if self.partial {
                if let Some(last) = self.lines.back_mut() {
                    last.extend_from_slice(content);
                    self.bytes += content.len();
                }
            } else if !content.is_empty() || terminated {
                self.bytes += content.len();
                self.lines.push_back(content.to_vec());
            }
            self.partial = !terminated && (self.partial || !content.is_empty());
            self.evict();
        }
    }

    fn evict(&mut self) {
        while self.lines.len() > self.max_lines || self.bytes > self.max_bytes {
            match self.lines.pop_front() {
                Some(dropped) => {
                    self.bytes -= dropped.len();
                    if self.lines.is_empty() {
                        self.partial = false;
                    }
                }
                None => break,
            }
        }
    }

    /// Consistent copy of the buffered lines, lossily decoded.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().map(|l| String::from_utf8_lossy(l).into_owned()).collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn byte_count(&self) -> usize {
        self.bytes
    }
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
