//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into terminal actions.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>

mod action;
mod params;
mod state;
mod utf8;

pub use action::{Action, CsiAction, EscAction, StringKind};
pub use params::{Params, MAX_PARAMS};
pub use state::{Parser, ParserState};
pub use utf8::REPLACEMENT_CHAR;
