//! Cell colors
//!
//! Supports the terminal default, the 256-entry indexed palette (16 ANSI
//! colors first) and 24-bit RGB.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Foreground or background color of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    /// Whatever the renderer uses as its default
    #[default]
    Default,
    /// Palette index. 0-7 standard, 8-15 bright, 16-231 color cube, 232-255 grayscale
    Indexed(u8),
    /// 24-bit color
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub fn indexed(index: u8) -> Self {
        Color::Indexed(index)
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }
}

/// Compact form used in snapshots: `default`, `idx:N` or `#rrggbb`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => f.write_str("default"),
            Color::Indexed(idx) => write!(f, "idx:{}", idx),
            Color::Rgb { r, g, b } => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}
