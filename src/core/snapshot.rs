//! Deterministic snapshot generation
//!
//! Snapshots capture the buffer in a serializable form for renderers,
//! golden tests and the headless runner. Given the same byte stream the
//! buffer always produces identical snapshots.
//!
//! Each line is stored as its text plus runs of non-default attributes, so
//! a mostly plain screen serializes compactly.

use serde::{Deserialize, Serialize};

use super::cell::Attributes;
use super::cursor::Cursor;
use super::line::Line;
use super::modes::Modes;
use super::screen::Screen;

/// A complete snapshot of the buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen dimensions
    pub cols: usize,
    pub rows: usize,
    pub cursor: CursorSnapshot,
    /// Scroll region, inclusive
    pub scroll_top: usize,
    pub scroll_bottom: usize,
    pub modes: ModesSnapshot,
    /// Visible lines, top to bottom
    pub lines: Vec<LineSnapshot>,
    /// Scrollback line count
    pub scrollback_lines: usize,
    /// Scrollback content, oldest first. Only filled when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scrollback: Vec<LineSnapshot>,
}

/// Snapshot of a single line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Text with trailing blanks trimmed
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrapped: bool,
    /// Runs of cells whose attributes differ from the default
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<SpanSnapshot>,
}

/// A run of cells sharing the same non-default attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSnapshot {
    /// First column of the run
    pub start: usize,
    /// Number of cells in the run
    pub len: usize,
    /// Foreground, in `Color`'s display form
    #[serde(default = "default_color", skip_serializing_if = "is_default_color")]
    pub fg: String,
    #[serde(default = "default_color", skip_serializing_if = "is_default_color")]
    pub bg: String,
    #[serde(flatten)]
    pub style: StyleSnapshot,
}

/// Snapshot of style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub faint: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn default_color() -> String {
    "default".to_string()
}

fn is_default_color(color: &str) -> bool {
    color == "default"
}

/// Snapshot of cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pending_wrap: bool,
}

/// Snapshot of mode flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModesSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub origin_mode: bool,
    pub auto_wrap: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub linefeed_mode: bool,
}

impl From<&Attributes> for StyleSnapshot {
    fn from(attrs: &Attributes) -> Self {
        StyleSnapshot {
            bold: attrs.bold,
            faint: attrs.faint,
            italic: attrs.italic,
            underline: attrs.underline,
            blink: attrs.blink,
            inverse: attrs.inverse,
            hidden: attrs.hidden,
            strikethrough: attrs.strikethrough,
        }
    }
}

impl SpanSnapshot {
    fn new(start: usize, attrs: &Attributes) -> Self {
        SpanSnapshot {
            start,
            len: 1,
            fg: attrs.fg.to_string(),
            bg: attrs.bg.to_string(),
            style: StyleSnapshot::from(attrs),
        }
    }
}

impl From<&Line> for LineSnapshot {
    fn from(line: &Line) -> Self {
        let mut spans: Vec<SpanSnapshot> = Vec::new();
        let mut previous: Option<&Attributes> = None;

        for (col, attrs) in line.attrs().enumerate() {
            if !attrs.is_default() {
                match spans.last_mut() {
                    Some(span) if previous == Some(attrs) => span.len += 1,
                    _ => spans.push(SpanSnapshot::new(col, attrs)),
                }
            }
            previous = Some(attrs);
        }

        LineSnapshot {
            text: line.text(),
            wrapped: line.is_wrapped(),
            spans,
        }
    }
}

impl CursorSnapshot {
    fn new(cursor: &Cursor, modes: &Modes) -> Self {
        CursorSnapshot {
            col: cursor.col,
            row: cursor.row,
            visible: modes.cursor_visible,
            pending_wrap: cursor.pending_wrap,
        }
    }
}

impl From<&Modes> for ModesSnapshot {
    fn from(modes: &Modes) -> Self {
        ModesSnapshot {
            origin_mode: modes.origin_mode,
            auto_wrap: modes.auto_wrap,
            linefeed_mode: modes.linefeed_mode,
        }
    }
}

impl Snapshot {
    /// Create a snapshot of the viewport
    pub fn from_screen(screen: &Screen) -> Self {
        Snapshot {
            cols: screen.cols(),
            rows: screen.rows(),
            cursor: CursorSnapshot::new(screen.cursor(), screen.modes()),
            scroll_top: screen.scroll_top(),
            scroll_bottom: screen.scroll_bottom(),
            modes: ModesSnapshot::from(screen.modes()),
            lines: screen.viewport().map(LineSnapshot::from).collect(),
            scrollback_lines: screen.scrollback_len(),
            scrollback: Vec::new(),
        }
    }

    /// Create a snapshot that also carries the scrollback content
    pub fn with_scrollback(screen: &Screen) -> Self {
        Snapshot {
            scrollback: screen.scrollback().map(LineSnapshot::from).collect(),
            ..Self::from_screen(screen)
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Viewport text, one line per row, with trailing empty rows removed
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(&line.text);
            result.push('\n');
        }

        while result.ends_with("\n\n") {
            result.pop();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;

    #[test]
    fn test_snapshot_from_screen() {
        let mut screen = Screen::new(10, 3, 100);
        screen.print('H');
        screen.print('i');

        let snapshot = Snapshot::from_screen(&screen);

        assert_eq!(snapshot.cols, 10);
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.lines.len(), 3);
        assert_eq!(snapshot.lines[0].text, "Hi");
        assert!(snapshot.lines[0].spans.is_empty());
        assert_eq!(snapshot.cursor.col, 2);
        assert_eq!(snapshot.cursor.row, 0);
        assert!(snapshot.cursor.visible);
    }

    #[test]
    fn test_snapshot_to_text() {
        let mut screen = Screen::new(10, 3, 100);
        screen.print('A');
        screen.print('B');
        screen.next_line();
        screen.print('C');

        let snapshot = Snapshot::from_screen(&screen);
        assert_eq!(snapshot.to_text(), "AB\nC\n");
    }

    #[test]
    fn test_snapshot_spans() {
        let mut screen = Screen::new(10, 1, 0);
        screen.print('a');
        screen.attrs_mut().bold = true;
        screen.attrs_mut().fg = Color::indexed(1);
        screen.print('b');
        screen.print('c');
        screen.attrs_mut().reset();
        screen.attrs_mut().bg = Color::rgb(0, 0, 255);
        screen.print('d');

        let line = &Snapshot::from_screen(&screen).lines[0];

        assert_eq!(line.spans.len(), 2);
        assert_eq!((line.spans[0].start, line.spans[0].len), (1, 2));
        assert_eq!(line.spans[0].fg, "idx:1");
        assert!(line.spans[0].style.bold);
        assert_eq!((line.spans[1].start, line.spans[1].len), (3, 1));
        assert_eq!(line.spans[1].bg, "#0000ff");
        assert_eq!(line.spans[1].fg, "default");
    }

    #[test]
    fn test_snapshot_with_scrollback() {
        let mut screen = Screen::new(5, 1, 10);
        screen.print('1');
        screen.next_line();
        screen.print('2');

        assert!(Snapshot::from_screen(&screen).scrollback.is_empty());

        let snapshot = Snapshot::with_scrollback(&screen);
        assert_eq!(snapshot.scrollback_lines, 1);
        assert_eq!(snapshot.scrollback[0].text, "1");
        assert_eq!(snapshot.lines[0].text, "2");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut screen = Screen::new(5, 2, 100);
        screen.print('X');
        screen.attrs_mut().underline = true;
        screen.attrs_mut().fg = Color::rgb(255, 128, 0);
        screen.print('Y');

        let snapshot = Snapshot::from_screen(&screen);
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();

        assert_eq!(snapshot, restored);
        assert!(!json.contains("\"bold\""));
    }

    #[test]
    fn test_snapshot_deterministic() {
        let build = || {
            let mut screen = Screen::new(8, 2, 10);
            for c in "deterministic".chars() {
                screen.print(c);
            }
            Snapshot::from_screen(&screen).to_json().unwrap()
        };
        assert_eq!(build(), build());
    }
}
