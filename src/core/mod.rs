//! Screen Buffer Core
//!
//! Platform-independent screen state. This module contains:
//! - Cell and attribute representation
//! - Fixed-width lines
//! - The line buffer holding scrollback and viewport together
//! - Cursor state and the saved-cursor stack
//! - Deterministic snapshot generation
//!
//! The core is deterministic: given the same sequence of operations it
//! always produces the same state.

mod buffer;
mod cell;
mod color;
mod cursor;
mod line;
mod modes;
mod screen;
mod snapshot;

pub use buffer::LineBuffer;
pub use cell::{Attributes, Cell};
pub use color::Color;
pub use cursor::{Cursor, SavedCursor, SAVED_CURSOR_LIMIT};
pub use line::Line;
pub use modes::Modes;
pub use screen::{Screen, MAX_DIMENSION};
pub use snapshot::{CursorSnapshot, LineSnapshot, ModesSnapshot, Snapshot, SpanSnapshot, StyleSnapshot};

pub(crate) use screen::clamp_dimension;
