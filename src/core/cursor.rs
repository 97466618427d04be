//! Cursor state management
//!
//! Position, pending wrap, the attribute applied to new characters, and
//! the stack used by save/restore.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::cell::Attributes;

/// Saved cursor entries kept before the oldest is dropped
pub const SAVED_CURSOR_LIMIT: usize = 64;

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Column position (0-indexed)
    pub col: usize,
    /// Row position within the viewport (0-indexed)
    pub row: usize,
    /// Cursor sits on the last column and the next character wraps first
    pub pending_wrap: bool,
    /// Attributes given to newly printed characters
    pub attrs: Attributes,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp the position into a `cols` x `rows` viewport
    pub fn clamp(&mut self, cols: usize, rows: usize) {
        self.col = self.col.min(cols.saturating_sub(1));
        self.row = self.row.min(rows.saturating_sub(1));
    }
}

/// Saved cursor state for DECSC/DECRC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCursor {
    pub col: usize,
    pub row: usize,
    pub attrs: Attributes,
    pub pending_wrap: bool,
    pub origin_mode: bool,
    pub autowrap: bool,
}

/// Bounded LIFO of saved cursors. Pushing onto a full stack drops the
/// oldest entry.
#[derive(Debug, Clone, Default)]
pub struct SavedCursorStack {
    entries: VecDeque<SavedCursor>,
}

impl SavedCursorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, saved: SavedCursor) {
        if self.entries.len() == SAVED_CURSOR_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(saved);
    }

    pub fn pop(&mut self) -> Option<SavedCursor> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
