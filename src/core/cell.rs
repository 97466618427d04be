//! Terminal cell representation
//!
//! Each cell holds one character and the attributes it was written with.
//! Cells are small `Copy` values that are replaced wholesale on write.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use super::color::Color;

/// Attributes that affect how a cell is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text (SGR 1)
    pub bold: bool,
    /// Faint/dim text (SGR 2)
    pub faint: bool,
    /// Italic text (SGR 3)
    pub italic: bool,
    /// Underlined text (SGR 4)
    pub underline: bool,
    /// Blinking text (SGR 5)
    pub blink: bool,
    /// Inverse/reverse video (SGR 7)
    pub inverse: bool,
    /// Hidden/invisible text (SGR 8)
    pub hidden: bool,
    /// Strikethrough text (SGR 9)
    pub strikethrough: bool,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all attributes to default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Foreground after applying inverse video
    pub fn effective_fg(&self) -> Color {
        if self.inverse {
            self.bg
        } else {
            self.fg
        }
    }

    /// Background after applying inverse video
    pub fn effective_bg(&self) -> Color {
        if self.inverse {
            self.fg
        } else {
            self.bg
        }
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    ch: char,
    attrs: Attributes,
}

impl Cell {
    /// The empty cell: a space with default attributes
    pub const BLANK: Cell = Cell {
        ch: ' ',
        attrs: Attributes {
            fg: Color::Default,
            bg: Color::Default,
            bold: false,
            faint: false,
            italic: false,
            underline: false,
            blink: false,
            inverse: false,
            hidden: false,
            strikethrough: false,
        },
    };

    pub fn new(ch: char, attrs: Attributes) -> Self {
        Self { ch, attrs }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// A space with default attributes
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Columns a character advances the cursor by. Zero-width characters
/// (combining marks, joiners) return 0; everything else occupies one cell.
pub(crate) fn advance_width(c: char) -> usize {
    match c.width() {
        Some(0) => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank() {
        let cell = Cell::default();
        assert!(cell.is_blank());
        assert_eq!(cell.ch(), ' ');
        assert!(cell.attrs().is_default());
    }

    #[test]
    fn test_cell_with_attrs() {
        let attrs = Attributes {
            bold: true,
            fg: Color::indexed(1),
            ..Attributes::default()
        };
        let cell = Cell::new('A', attrs);
        assert_eq!(cell.ch(), 'A');
        assert!(cell.attrs().bold);
        assert!(!cell.is_blank());

        // A styled space is not blank
        assert!(!Cell::new(' ', attrs).is_blank());
    }

    #[test]
    fn test_attributes_inverse() {
        let attrs = Attributes {
            fg: Color::indexed(1),
            bg: Color::indexed(0),
            inverse: true,
            ..Attributes::default()
        };

        assert_eq!(attrs.effective_fg(), Color::indexed(0));
        assert_eq!(attrs.effective_bg(), Color::indexed(1));
    }

    #[test]
    fn test_attributes_reset() {
        let mut attrs = Attributes::new();
        attrs.bold = true;
        attrs.strikethrough = true;
        attrs.fg = Color::indexed(1);

        attrs.reset();

        assert!(attrs.is_default());
    }

    #[test]
    fn test_advance_width() {
        assert_eq!(advance_width('A'), 1);
        assert_eq!(advance_width('中'), 1);
        assert_eq!(advance_width('\u{0301}'), 0); // combining acute accent
    }
}
