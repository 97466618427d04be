//! Terminal line representation
//!
//! A line is a fixed-length row of cells. The length only changes through
//! [`Line::resize`], which reallocates the row at the new width.

use super::cell::{Attributes, Cell};

/// A single line in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    cells: Box<[Cell]>,
    /// Whether output continued onto the next line through autowrap
    wrapped: bool,
}

impl Line {
    /// Create a blank line with the specified number of columns
    pub fn new(cols: usize) -> Self {
        Self {
            cells: vec![Cell::BLANK; cols].into_boxed_slice(),
            wrapped: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The attribute of every cell, in column order. Always yields exactly
    /// `cols()` items.
    pub fn attrs(&self) -> impl ExactSizeIterator<Item = &Attributes> + '_ {
        self.cells.iter().map(Cell::attrs)
    }

    pub fn get(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Overwrite the cell at `col`. Out-of-range columns are ignored.
    pub fn set(&mut self, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(col) {
            *slot = cell;
        }
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn set_wrapped(&mut self, wrapped: bool) {
        self.wrapped = wrapped;
    }

    /// Blank the entire line
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.wrapped = false;
    }

    /// Blank from column to end of line
    pub fn clear_from(&mut self, col: usize) {
        let start = col.min(self.cells.len());
        self.cells[start..].fill(Cell::BLANK);
        self.wrapped = false;
    }

    /// Blank from start of line to column (inclusive)
    pub fn clear_to(&mut self, col: usize) {
        let end = col.saturating_add(1).min(self.cells.len());
        self.cells[..end].fill(Cell::BLANK);
    }

    /// Blank `n` cells starting at column without shifting
    pub fn erase(&mut self, col: usize, n: usize) {
        let start = col.min(self.cells.len());
        let end = col.saturating_add(n).min(self.cells.len());
        self.cells[start..end].fill(Cell::BLANK);
    }

    /// Insert `n` blanks at column, shifting the rest right. Cells pushed
    /// past the end are lost.
    pub fn insert_blanks(&mut self, col: usize, n: usize) {
        if col >= self.cells.len() {
            return;
        }
        let tail = &mut self.cells[col..];
        let n = n.min(tail.len());
        tail.rotate_right(n);
        tail[..n].fill(Cell::BLANK);
    }

    /// Delete `n` cells at column, shifting the rest left and filling the
    /// end with blanks
    pub fn delete(&mut self, col: usize, n: usize) {
        if col >= self.cells.len() {
            return;
        }
        let tail = &mut self.cells[col..];
        let n = n.min(tail.len());
        tail.rotate_left(n);
        let len = tail.len();
        tail[len - n..].fill(Cell::BLANK);
    }

    /// Reallocate at a new width, truncating or padding with blanks.
    /// No rewrapping is done.
    pub fn resize(&mut self, cols: usize) {
        if cols == self.cells.len() {
            return;
        }
        let mut cells = Vec::with_capacity(cols);
        cells.extend(self.cells.iter().copied().take(cols));
        cells.resize(cols, Cell::BLANK);
        self.cells = cells.into_boxed_slice();
    }

    /// Text content with trailing spaces trimmed
    pub fn text(&self) -> String {
        let text: String = self.cells.iter().map(Cell::ch).collect();
        text.trim_end_matches(' ').to_string()
    }

    /// Check if every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}
