//! Screen model implementation
//!
//! The screen owns the line buffer (scrollback plus viewport), the cursor,
//! the saved-cursor stack, the scroll region and the mode flags. Every
//! operation here keeps the cursor inside the viewport and every line at
//! exactly `cols` cells.

use tracing::{debug, trace};

use super::buffer::LineBuffer;
use super::cell::{advance_width, Attributes, Cell};
use super::cursor::{Cursor, SavedCursor, SavedCursorStack};
use super::line::Line;
use super::modes::Modes;

/// Tab stops fall on every multiple of this column
const TAB_WIDTH: usize = 8;

/// Largest accepted width or height. A full 2048x2048 viewport is about
/// 80 MiB of cells before any scrollback.
pub const MAX_DIMENSION: usize = 2048;

/// Clamp a requested dimension into `1..=MAX_DIMENSION`
pub(crate) fn clamp_dimension(n: usize) -> usize {
    n.clamp(1, MAX_DIMENSION)
}

/// The main screen structure
#[derive(Debug, Clone)]
pub struct Screen {
    buffer: LineBuffer,
    cursor: Cursor,
    saved: SavedCursorStack,
    modes: Modes,
    /// Modes restored by a full reset
    default_modes: Modes,
    /// Scroll region as inclusive viewport rows. `None` means the whole
    /// screen.
    scroll_region: Option<(usize, usize)>,
}

impl Screen {
    /// Create a new screen with the given dimensions. Zero or oversized
    /// dimensions are clamped.
    pub fn new(cols: usize, rows: usize, scrollback_limit: usize) -> Self {
        Self::with_modes(cols, rows, scrollback_limit, Modes::default())
    }

    /// Create a screen whose initial (and post-reset) modes are `modes`
    pub fn with_modes(cols: usize, rows: usize, scrollback_limit: usize, modes: Modes) -> Self {
        let cols = clamp_dimension(cols);
        let rows = clamp_dimension(rows);
        Self {
            buffer: LineBuffer::new(cols, rows, scrollback_limit),
            cursor: Cursor::new(),
            saved: SavedCursorStack::new(),
            modes,
            default_modes: modes,
            scroll_region: None,
        }
    }

    pub fn cols(&self) -> usize {
        self.buffer.cols()
    }

    pub fn rows(&self) -> usize {
        self.buffer.rows()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Attributes applied to the next printed character
    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.cursor.attrs
    }

    pub fn scrollback_len(&self) -> usize {
        self.buffer.scrollback_len()
    }

    pub fn scrollback_limit(&self) -> usize {
        self.buffer.scrollback_limit()
    }

    /// Every retained line, scrollback first
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &Line> + '_ {
        self.buffer.iter()
    }

    /// The visible lines, top to bottom
    pub fn viewport(&self) -> impl ExactSizeIterator<Item = &Line> + '_ {
        self.buffer.viewport()
    }

    /// Scrollback lines, oldest first
    pub fn scrollback(&self) -> impl ExactSizeIterator<Item = &Line> + '_ {
        self.buffer.scrollback()
    }

    /// Viewport line at `row`, or `None` past the bottom
    pub fn line(&self, row: usize) -> Option<&Line> {
        (row < self.rows()).then(|| self.buffer.line(row))
    }

    /// Scroll region top (0-indexed, inclusive)
    pub fn scroll_top(&self) -> usize {
        self.scroll_region.map_or(0, |(top, _)| top)
    }

    /// Scroll region bottom (0-indexed, inclusive)
    pub fn scroll_bottom(&self) -> usize {
        self.scroll_region.map_or(self.rows() - 1, |(_, bottom)| bottom)
    }

    pub fn set_scrollback_limit(&mut self, limit: usize) {
        self.buffer.set_scrollback_limit(limit);
    }

    /// Print a character at the current cursor position
    pub fn print(&mut self, c: char) {
        if advance_width(c) == 0 {
            return;
        }

        if self.cursor.pending_wrap {
            self.wrap_cursor();
        }

        let Cursor { col, row, attrs, .. } = self.cursor;
        self.buffer.line_mut(row).set(col, Cell::new(c, attrs));

        if col + 1 >= self.cols() {
            // Autowrap off: the next character overwrites the last column
            self.cursor.pending_wrap = self.modes.auto_wrap;
        } else {
            self.cursor.col = col + 1;
        }
    }

    /// Handle cursor wrap (newline at end of line)
    fn wrap_cursor(&mut self) {
        self.buffer.line_mut(self.cursor.row).set_wrapped(true);
        self.cursor.col = 0;
        self.index();
    }

    /// Handle linefeed (LF, VT, FF)
    pub fn linefeed(&mut self) {
        self.index();
        if self.modes.linefeed_mode {
            self.cursor.col = 0;
        }
    }

    /// Handle carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Handle backspace (BS)
    pub fn backspace(&mut self) {
        self.cursor.pending_wrap = false;
        self.cursor.col = self.cursor.col.saturating_sub(1);
    }

    /// Handle horizontal tab (HT)
    pub fn tab(&mut self) {
        self.cursor.pending_wrap = false;
        let next = (self.cursor.col / TAB_WIDTH + 1) * TAB_WIDTH;
        self.cursor.col = next.min(self.cols() - 1);
    }

    /// Handle index (IND) - move cursor down, scroll if at bottom
    pub fn index(&mut self) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;

        if row == self.scroll_bottom() {
            self.scroll_up(1);
        } else if row + 1 < self.rows() {
            self.cursor.row = row + 1;
        }
    }

    /// Handle reverse index (RI) - move cursor up, scroll if at top
    pub fn reverse_index(&mut self) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;

        if row == self.scroll_top() {
            self.scroll_down(1);
        } else if row > 0 {
            self.cursor.row = row - 1;
        }
    }

    /// Handle next line (NEL) - move to start of next line
    pub fn next_line(&mut self) {
        self.index();
        self.cursor.col = 0;
    }

    /// Scroll the region up by n lines (content moves up, new lines at bottom)
    pub fn scroll_up(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top(), self.scroll_bottom());
        self.buffer.scroll_up(top, bottom, n);
    }

    /// Scroll the region down by n lines (content moves down, new lines at top)
    pub fn scroll_down(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top(), self.scroll_bottom());
        self.buffer.scroll_down(top, bottom, n);
    }

    /// Set scroll region (DECSTBM). Rows are 0-indexed and inclusive.
    /// Regions with `top >= bottom` are ignored.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.rows() - 1);
        if top >= bottom {
            trace!(top, bottom, "ignoring invalid scroll region");
            return;
        }

        self.scroll_region = if top == 0 && bottom == self.rows() - 1 {
            None
        } else {
            Some((top, bottom))
        };
        self.move_cursor_to(0, 0);
    }

    /// Move cursor to position (CUP/HVP). In origin mode the row is
    /// relative to the scroll region.
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        self.set_cursor_row(row);
        self.set_cursor_col(col);
    }

    /// Move cursor to column (CHA)
    pub fn set_cursor_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.cols() - 1);
        self.cursor.pending_wrap = false;
    }

    /// Move cursor to row (VPA)
    pub fn set_cursor_row(&mut self, row: usize) {
        self.cursor.row = if self.modes.origin_mode {
            self.scroll_top()
                .saturating_add(row)
                .min(self.scroll_bottom())
        } else {
            row.min(self.rows() - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// Move cursor up (CUU). Stops at the top margin when starting inside
    /// the scroll region.
    pub fn move_cursor_up(&mut self, n: usize) {
        let row = self.cursor.row;
        let limit = if row >= self.scroll_top() {
            self.scroll_top()
        } else {
            0
        };
        self.cursor.row = row.saturating_sub(n).max(limit);
        self.cursor.pending_wrap = false;
    }

    /// Move cursor down (CUD). Stops at the bottom margin when starting
    /// inside the scroll region.
    pub fn move_cursor_down(&mut self, n: usize) {
        let row = self.cursor.row;
        let limit = if row <= self.scroll_bottom() {
            self.scroll_bottom()
        } else {
            self.rows() - 1
        };
        self.cursor.row = row.saturating_add(n).min(limit);
        self.cursor.pending_wrap = false;
    }

    /// Move cursor forward/right (CUF)
    pub fn move_cursor_right(&mut self, n: usize) {
        let col = self.cursor.col.saturating_add(n);
        self.set_cursor_col(col);
    }

    /// Move cursor backward/left (CUB)
    pub fn move_cursor_left(&mut self, n: usize) {
        let col = self.cursor.col.saturating_sub(n);
        self.set_cursor_col(col);
    }

    /// Erase in display (ED)
    pub fn erase_display(&mut self, mode: u16) {
        let Cursor { col, row, .. } = self.cursor;
        match mode {
            0 => {
                self.buffer.line_mut(row).clear_from(col);
                for r in row + 1..self.rows() {
                    self.buffer.line_mut(r).clear();
                }
            }
            1 => {
                for r in 0..row {
                    self.buffer.line_mut(r).clear();
                }
                self.buffer.line_mut(row).clear_to(col);
            }
            2 => self.buffer.clear_viewport(),
            3 => self.buffer.clear_scrollback(),
            _ => trace!(mode, "ignoring erase in display mode"),
        }
    }

    /// Erase in line (EL)
    pub fn erase_line(&mut self, mode: u16) {
        let Cursor { col, row, .. } = self.cursor;
        let line = self.buffer.line_mut(row);
        match mode {
            0 => line.clear_from(col),
            1 => line.clear_to(col),
            2 => line.clear(),
            _ => trace!(mode, "ignoring erase in line mode"),
        }
    }

    /// Erase characters (ECH)
    pub fn erase_chars(&mut self, n: usize) {
        let Cursor { col, row, .. } = self.cursor;
        self.buffer.line_mut(row).erase(col, n);
    }

    /// Insert blank characters (ICH)
    pub fn insert_chars(&mut self, n: usize) {
        let Cursor { col, row, .. } = self.cursor;
        self.buffer.line_mut(row).insert_blanks(col, n);
        self.cursor.pending_wrap = false;
    }

    /// Delete characters (DCH)
    pub fn delete_chars(&mut self, n: usize) {
        let Cursor { col, row, .. } = self.cursor;
        self.buffer.line_mut(row).delete(col, n);
        self.cursor.pending_wrap = false;
    }

    /// Insert lines (IL). Only works within the scroll region.
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        let bottom = self.scroll_bottom();
        if row < self.scroll_top() || row > bottom {
            return;
        }
        self.buffer.scroll_down(row, bottom, n);
        self.carriage_return();
    }

    /// Delete lines (DL). Only works within the scroll region.
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        let bottom = self.scroll_bottom();
        if row < self.scroll_top() || row > bottom {
            return;
        }
        self.buffer.rotate_up(row, bottom, n);
        self.carriage_return();
    }

    /// Save cursor state (DECSC)
    pub fn save_cursor(&mut self) {
        self.saved.push(SavedCursor {
            col: self.cursor.col,
            row: self.cursor.row,
            attrs: self.cursor.attrs,
            pending_wrap: self.cursor.pending_wrap,
            origin_mode: self.modes.origin_mode,
            autowrap: self.modes.auto_wrap,
        });
    }

    /// Restore cursor state (DECRC). With nothing saved the cursor goes
    /// home with default attributes.
    pub fn restore_cursor(&mut self) {
        let Some(saved) = self.saved.pop() else {
            self.cursor = Cursor::new();
            self.modes.origin_mode = false;
            return;
        };

        self.modes.origin_mode = saved.origin_mode;
        self.modes.auto_wrap = saved.autowrap;
        self.cursor = Cursor {
            col: saved.col,
            row: saved.row,
            pending_wrap: saved.pending_wrap && saved.autowrap,
            attrs: saved.attrs,
        };

        let (cols, rows) = (self.cols(), self.rows());
        if self.cursor.col >= cols || self.cursor.row >= rows {
            self.cursor.clamp(cols, rows);
            self.cursor.pending_wrap = false;
        }
    }

    /// Set or reset an ANSI mode (SM/RM)
    pub fn set_mode(&mut self, mode: u16, value: bool) {
        self.modes.set_mode(mode, value);
    }

    /// Set or reset a DEC private mode (DECSET/DECRST)
    pub fn set_dec_mode(&mut self, mode: u16, value: bool) {
        if !self.modes.set_dec_mode(mode, value) {
            return;
        }
        match mode {
            6 => self.move_cursor_to(0, 0),
            7 if !value => self.cursor.pending_wrap = false,
            _ => {}
        }
    }

    /// Resize the screen. Lines are padded or truncated, never rewrapped.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let cols = clamp_dimension(cols);
        let rows = clamp_dimension(rows);
        if cols == self.cols() && rows == self.rows() {
            return;
        }
        debug!(
            from_cols = self.cols(),
            from_rows = self.rows(),
            cols,
            rows,
            "resizing screen"
        );

        self.cursor.row = self.buffer.resize(cols, rows, self.cursor.row);
        self.cursor.clamp(cols, rows);
        self.cursor.pending_wrap = false;
        self.scroll_region = None;
    }

    /// Reset the screen to its initial state (RIS). Dimensions, the
    /// scrollback limit and the configured modes are kept.
    pub fn reset(&mut self) {
        self.buffer = LineBuffer::new(self.cols(), self.rows(), self.scrollback_limit());
        self.cursor = Cursor::new();
        self.saved.clear();
        self.modes = self.default_modes;
        self.scroll_region = None;
    }
}
