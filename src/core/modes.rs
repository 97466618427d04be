//! Terminal modes
//!
//! The handful of ANSI (`CSI h`/`CSI l`) and DEC private (`CSI ? h`/`CSI ? l`)
//! modes that change how the screen buffer behaves. Everything else is
//! accepted and ignored.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// DECOM (?6): cursor addressing is relative to the scroll region
    pub origin_mode: bool,
    /// DECAWM (?7): printing past the last column wraps to the next line
    pub auto_wrap: bool,
    /// DECTCEM (?25)
    pub cursor_visible: bool,
    /// LNM (20): LF, VT and FF also return the carriage
    pub linefeed_mode: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            origin_mode: false,
            auto_wrap: true,
            cursor_visible: true,
            linefeed_mode: false,
        }
    }
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an ANSI mode. Returns false for modes this buffer doesn't track.
    pub fn set_mode(&mut self, mode: u16, value: bool) -> bool {
        match mode {
            20 => self.linefeed_mode = value,
            _ => {
                trace!(mode, value, "ignoring ANSI mode");
                return false;
            }
        }
        true
    }

    /// Set a DEC private mode. Returns false for modes this buffer doesn't track.
    pub fn set_dec_mode(&mut self, mode: u16, value: bool) -> bool {
        match mode {
            6 => self.origin_mode = value,
            7 => self.auto_wrap = value,
            25 => self.cursor_visible = value,
            _ => {
                trace!(mode, value, "ignoring DEC private mode");
                return false;
            }
        }
        true
    }
}
