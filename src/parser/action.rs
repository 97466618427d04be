//! Actions produced by the parser
//!
//! Each action is one complete unit of the input stream: a printable
//! character, a C0 control, or a finished escape sequence.

use super::params::Params;

/// Actions produced by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a character to the screen
    Print(char),

    /// Execute a C0 control character
    /// BEL (0x07), BS (0x08), HT (0x09), LF (0x0A), VT (0x0B), FF (0x0C), CR (0x0D)
    Control(u8),

    /// ESC sequence (non-CSI)
    Esc(EscAction),

    /// CSI (Control Sequence Introducer) sequence
    Csi(CsiAction),

    /// An OSC string ran to its terminator. The payload is never kept;
    /// only its length is reported.
    OscConsumed { len: usize },

    /// A DCS, SOS, PM or APC string was swallowed up to ST
    StringConsumed { kind: StringKind, len: usize },
}

/// Control strings that are consumed without being interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// ESC P
    Dcs,
    /// ESC X
    Sos,
    /// ESC ^
    Pm,
    /// ESC _
    Apc,
}

/// ESC sequence actions (non-CSI)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscAction {
    /// ESC 7 - Save cursor (DECSC)
    SaveCursor,
    /// ESC 8 - Restore cursor (DECRC)
    RestoreCursor,
    /// ESC D - Index (IND)
    Index,
    /// ESC M - Reverse Index (RI)
    ReverseIndex,
    /// ESC E - Next Line (NEL)
    NextLine,
    /// ESC c - Full Reset (RIS)
    FullReset,
}

/// A dispatched CSI sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiAction {
    /// Parameters (semicolon-separated numbers)
    pub params: Params,
    /// Intermediate bytes (0x20-0x2F)
    pub intermediates: Vec<u8>,
    /// Final byte (0x40-0x7E)
    pub final_byte: u8,
    /// Private marker: `?`, `>`, `<` or `=`
    pub marker: Option<u8>,
}

impl CsiAction {
    /// Get a parameter, substituting `default` when it is missing or zero
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).unwrap_or(default)
    }

    /// Same as [`param`](Self::param) but widened for use as a count or position
    pub fn count(&self, index: usize, default: u16) -> usize {
        usize::from(self.param(index, default))
    }

    /// Check for a plain CSI sequence with this final byte
    pub fn is(&self, final_byte: u8) -> bool {
        self.final_byte == final_byte && self.intermediates.is_empty() && self.marker.is_none()
    }

    /// Check for a DEC private (`?`) CSI sequence with this final byte
    pub fn is_private(&self, final_byte: u8) -> bool {
        self.final_byte == final_byte && self.intermediates.is_empty() && self.marker == Some(b'?')
    }
}
