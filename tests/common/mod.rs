//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use tedit::editable::{Buffer, Position};
use tedit::session::EditSession;

/// Owned lines from string slices
pub fn lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Shorthand for `Position::new`
pub fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}

/// Buffer holding `text` with the cursor at (line, column)
pub fn buffer_with(text: &str, line: usize, column: usize) -> Buffer {
    let mut buffer = Buffer::from_text(text);
    buffer.set_cursor(pos(line, column));
    buffer
}

/// Session holding `text` with the cursor at (line, column)
pub fn session_with(text: &str, line: usize, column: usize) -> EditSession {
    let mut session = EditSession::from_text(text);
    session.buffer_mut().set_cursor(pos(line, column));
    session
}

/// Small deterministic generator for property-style tests
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Value in `0..bound` (bound must be > 0)
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}
