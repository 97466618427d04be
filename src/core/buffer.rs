//! Line storage shared by the scrollback and the viewport
//!
//! All lines live in one `VecDeque`, oldest first. The newest `rows` lines
//! are the viewport; everything in front of them is scrollback. The store
//! always holds between `rows` and `rows + scrollback_limit` lines, and
//! evicts from the front when it would grow past that.

use std::collections::{vec_deque, VecDeque};

use super::line::Line;

/// Lines of the screen buffer, scrollback first
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<Line>,
    cols: usize,
    rows: usize,
    scrollback_limit: usize,
}

impl LineBuffer {
    /// Create a buffer with a blank viewport. `cols` and `rows` must be non-zero.
    pub fn new(cols: usize, rows: usize, scrollback_limit: usize) -> Self {
        let mut lines = VecDeque::with_capacity(rows);
        lines.extend((0..rows).map(|_| Line::new(cols)));
        Self {
            lines,
            cols,
            rows,
            scrollback_limit,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn scrollback_limit(&self) -> usize {
        self.scrollback_limit
    }

    /// Total retained lines, scrollback included
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Never true; the viewport always exists
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn scrollback_len(&self) -> usize {
        self.lines.len() - self.rows
    }

    /// Every retained line, oldest first
    pub fn iter(&self) -> vec_deque::Iter<'_, Line> {
        self.lines.iter()
    }

    /// The viewport lines, top to bottom
    pub fn viewport(&self) -> vec_deque::Iter<'_, Line> {
        self.lines.range(self.base()..)
    }

    /// The scrollback lines, oldest first
    pub fn scrollback(&self) -> vec_deque::Iter<'_, Line> {
        self.lines.range(..self.base())
    }

    /// Index of the first viewport line
    fn base(&self) -> usize {
        self.lines.len() - self.rows
    }

    /// Viewport line at `row`. Rows past the bottom resolve to the last line.
    pub fn line(&self, row: usize) -> &Line {
        let index = self.base() + row.min(self.rows - 1);
        &self.lines[index]
    }

    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        let index = self.base() + row.min(self.rows - 1);
        &mut self.lines[index]
    }

    /// Scroll viewport rows `top..=bottom` up by `n`. When the region starts
    /// at the top of the viewport the lines leaving it become scrollback;
    /// otherwise they are discarded.
    pub fn scroll_up(&mut self, top: usize, bottom: usize, n: usize) {
        if top > bottom || bottom >= self.rows {
            return;
        }
        let n = n.min(bottom - top + 1);
        if top != 0 {
            return self.rotate_up(top, bottom, n);
        }

        for _ in 0..n {
            // The viewport slides down by one, so the old top line now
            // counts as scrollback
            let at = self.base() + bottom + 1;
            self.lines.insert(at, Line::new(self.cols));
        }
        self.evict();
    }

    /// Scroll viewport rows `top..=bottom` up by `n`, discarding the lines
    /// that leave the region
    pub fn rotate_up(&mut self, top: usize, bottom: usize, n: usize) {
        if top > bottom || bottom >= self.rows {
            return;
        }
        let n = n.min(bottom - top + 1);
        let base = self.base();
        for _ in 0..n {
            self.lines.remove(base + top);
            self.lines.insert(base + bottom, Line::new(self.cols));
        }
    }

    /// Scroll viewport rows `top..=bottom` down by `n`, inserting blank
    /// lines at `top`
    pub fn scroll_down(&mut self, top: usize, bottom: usize, n: usize) {
        if top > bottom || bottom >= self.rows {
            return;
        }
        let n = n.min(bottom - top + 1);
        let base = self.base();
        for _ in 0..n {
            self.lines.remove(base + bottom);
            self.lines.insert(base + top, Line::new(self.cols));
        }
    }

    /// Blank every viewport line
    pub fn clear_viewport(&mut self) {
        let base = self.base();
        for line in self.lines.range_mut(base..) {
            line.clear();
        }
    }

    /// Drop all scrollback
    pub fn clear_scrollback(&mut self) {
        let excess = self.scrollback_len();
        self.lines.drain(..excess);
    }

    pub fn set_scrollback_limit(&mut self, limit: usize) {
        self.scrollback_limit = limit;
        self.evict();
    }

    /// Change dimensions. Every line is reallocated at the new width. A
    /// shorter viewport first drops blank lines below `cursor_row`, then
    /// trims from the oldest end until exactly `rows` lines remain; a taller
    /// one gets blank lines added at the bottom.
    ///
    /// Returns the cursor row in the new viewport, not yet clamped.
    pub fn resize(&mut self, cols: usize, rows: usize, cursor_row: usize) -> usize {
        if cols != self.cols {
            for line in &mut self.lines {
                line.resize(cols);
            }
            self.cols = cols;
        }

        let mut cursor_index = self.base() + cursor_row;

        if rows < self.rows {
            let mut surplus = self.rows - rows;
            while surplus > 0
                && self.lines.len() - 1 > cursor_index
                && self.lines.back().is_some_and(Line::is_blank)
            {
                self.lines.pop_back();
                surplus -= 1;
            }

            let excess = self.lines.len() - rows;
            self.lines.drain(..excess);
            cursor_index = cursor_index.saturating_sub(excess);
        } else if rows > self.rows {
            let cols = self.cols;
            let added = rows - self.rows;
            self.lines.extend((0..added).map(|_| Line::new(cols)));
        }

        self.rows = rows;
        self.evict();
        cursor_index.saturating_sub(self.base())
    }

    fn evict(&mut self) {
        let cap = self.rows.saturating_add(self.scrollback_limit);
        if self.lines.len() > cap {
            let excess = self.lines.len() - cap;
            self.lines.drain(..excess);
        }
    }
}
