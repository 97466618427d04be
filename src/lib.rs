//! termbuf: a terminal screen-buffer engine
//!
//! Consumes the raw byte stream a shell writes to its terminal and keeps a
//! bounded grid of character cells up to date. This crate provides:
//!
//! - `parser`: a streaming VT/ANSI escape-sequence state machine
//! - `core`: cells, lines, cursor state, the scrollback-backed screen and
//!   snapshots
//! - `terminal`: the [`Terminal`] that feeds parser output into the screen
//! - `config`: JSON configuration for initial size and scrollback
//!
//! The engine never fails on input. Unknown or malformed sequences are
//! ignored, and every line always has exactly `cols` cells.
//!
//! ```
//! use termbuf::Terminal;
//!
//! let mut term = Terminal::new(20, 3, 100);
//! term.feed(b"Hello\x1b]0;title\x07 World");
//! assert_eq!(term.viewport().next().map(|l| l.text()), Some("Hello World".to_string()));
//! ```

pub mod config;
pub mod core;
pub mod parser;
pub mod terminal;

pub use config::{Config, ConfigError};
pub use terminal::{RenderHook, Terminal};
