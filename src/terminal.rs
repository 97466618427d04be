//! Terminal Executor
//!
//! Ties together the parser and the screen model: bytes go in through
//! [`Terminal::feed`], the parser turns them into actions, and each action
//! is applied to the screen. This is the public entry point of the crate.

use tracing::trace;

use crate::config::Config;
use crate::core::{Color, Cursor, Line, Modes, Screen, Snapshot};
use crate::parser::{Action, CsiAction, EscAction, Params, Parser};

/// Callback invoked after every `feed` and `set_size`. It carries no
/// payload; read the new state back through the terminal.
pub type RenderHook = Box<dyn FnMut() + Send>;

/// Terminal executor that processes parsed actions and updates the screen
pub struct Terminal {
    parser: Parser,
    screen: Screen,
    render_hook: Option<RenderHook>,
}

impl Terminal {
    /// Create a new terminal with the given dimensions. Zero or oversized
    /// dimensions are clamped.
    pub fn new(cols: usize, rows: usize, scrollback_limit: usize) -> Self {
        Self {
            parser: Parser::new(),
            screen: Screen::new(cols, rows, scrollback_limit),
            render_hook: None,
        }
    }

    /// Create a terminal from configuration
    pub fn from_config(config: &Config) -> Self {
        let modes = Modes {
            linefeed_mode: config.convert_eol,
            ..Modes::default()
        };
        Self {
            parser: Parser::new(),
            screen: Screen::with_modes(
                config.effective_cols(),
                config.effective_rows(),
                config.scrollback_limit,
                modes,
            ),
            render_hook: None,
        }
    }

    /// Attach a render hook at construction
    pub fn with_render_hook(mut self, hook: RenderHook) -> Self {
        self.render_hook = Some(hook);
        self
    }

    /// Replace the render hook, returning the previous one
    pub fn set_render_hook(&mut self, hook: Option<RenderHook>) -> Option<RenderHook> {
        std::mem::replace(&mut self.render_hook, hook)
    }

    /// Process output bytes from the child process
    pub fn feed(&mut self, data: &[u8]) {
        let Self { parser, screen, .. } = self;
        parser.parse(data, |action| apply_action(screen, action));
        self.notify();
    }

    pub fn feed_str(&mut self, data: &str) {
        self.feed(data.as_bytes());
    }

    /// Resize the terminal. Never fails; dimensions are clamped into
    /// `1..=MAX_DIMENSION`.
    pub fn set_size(&mut self, cols: usize, rows: usize) {
        self.screen.resize(cols, rows);
        self.notify();
    }

    pub fn set_scrollback_limit(&mut self, limit: usize) {
        self.screen.set_scrollback_limit(limit);
    }

    /// Full reset of the screen and parser, as if `ESC c` arrived
    pub fn reset(&mut self) {
        self.parser.reset();
        self.screen.reset();
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(hook) = self.render_hook.as_mut() {
            hook();
        }
    }

    pub fn cols(&self) -> usize {
        self.screen.cols()
    }

    pub fn rows(&self) -> usize {
        self.screen.rows()
    }

    /// Every retained line, oldest scrollback first, viewport last
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &Line> + '_ {
        self.screen.lines()
    }

    /// The visible lines, top to bottom
    pub fn viewport(&self) -> impl ExactSizeIterator<Item = &Line> + '_ {
        self.screen.viewport()
    }

    pub fn scrollback_len(&self) -> usize {
        self.screen.scrollback_len()
    }

    pub fn cursor(&self) -> &Cursor {
        self.screen.cursor()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(&self.screen)
    }
}

/// Apply a single parsed action to the screen
fn apply_action(screen: &mut Screen, action: Action) {
    match action {
        Action::Print(c) => screen.print(c),
        Action::Control(byte) => apply_control(screen, byte),
        Action::Esc(esc) => apply_esc(screen, esc),
        Action::Csi(csi) => apply_csi(screen, &csi),
        Action::OscConsumed { len } => trace!(len, "discarded OSC string"),
        Action::StringConsumed { kind, len } => trace!(?kind, len, "discarded control string"),
    }
}

/// Execute a C0 control character
fn apply_control(screen: &mut Screen, byte: u8) {
    match byte {
        0x08 => screen.backspace(),
        0x09 => screen.tab(),
        // VT and FF are treated as LF
        0x0A..=0x0C => screen.linefeed(),
        0x0D => screen.carriage_return(),
        _ => trace!(byte, "ignoring control"),
    }
}

/// Execute an ESC sequence
fn apply_esc(screen: &mut Screen, esc: EscAction) {
    match esc {
        EscAction::SaveCursor => screen.save_cursor(),
        EscAction::RestoreCursor => screen.restore_cursor(),
        EscAction::Index => screen.index(),
        EscAction::ReverseIndex => screen.reverse_index(),
        EscAction::NextLine => screen.next_line(),
        // The parser is already back in ground state
        EscAction::FullReset => screen.reset(),
    }
}

/// Execute a CSI sequence
fn apply_csi(screen: &mut Screen, csi: &CsiAction) {
    if !csi.intermediates.is_empty() {
        trace!(?csi, "ignoring CSI with intermediates");
        return;
    }

    match (csi.marker, csi.final_byte) {
        // Cursor movement
        (None, b'A') => screen.move_cursor_up(csi.count(0, 1)),
        (None, b'B') => screen.move_cursor_down(csi.count(0, 1)),
        (None, b'C') => screen.move_cursor_right(csi.count(0, 1)),
        (None, b'D') => screen.move_cursor_left(csi.count(0, 1)),
        (None, b'E') => {
            screen.move_cursor_down(csi.count(0, 1));
            screen.carriage_return();
        }
        (None, b'F') => {
            screen.move_cursor_up(csi.count(0, 1));
            screen.carriage_return();
        }
        (None, b'G') | (None, b'`') => screen.set_cursor_col(csi.count(0, 1) - 1),
        (None, b'd') => screen.set_cursor_row(csi.count(0, 1) - 1),
        (None, b'H') | (None, b'f') => {
            screen.move_cursor_to(csi.count(0, 1) - 1, csi.count(1, 1) - 1);
        }

        // Erase
        (None, b'J') => screen.erase_display(csi.param(0, 0)),
        (None, b'K') => screen.erase_line(csi.param(0, 0)),
        (None, b'X') => screen.erase_chars(csi.count(0, 1)),

        // Insert/Delete
        (None, b'@') => screen.insert_chars(csi.count(0, 1)),
        (None, b'P') => screen.delete_chars(csi.count(0, 1)),
        (None, b'L') => screen.insert_lines(csi.count(0, 1)),
        (None, b'M') => screen.delete_lines(csi.count(0, 1)),

        // Scroll
        (None, b'S') => screen.scroll_up(csi.count(0, 1)),
        (None, b'T') => screen.scroll_down(csi.count(0, 1)),
        (None, b'r') => {
            let top = csi.count(0, 1);
            let bottom = csi.params.get(1).map_or(screen.rows(), usize::from);
            screen.set_scroll_region(top - 1, bottom - 1);
        }

        // Cursor save/restore (ANSI.SYS)
        (None, b's') if csi.params.is_empty() => screen.save_cursor(),
        (None, b'u') if csi.params.is_empty() => screen.restore_cursor(),

        (None, b'm') => apply_sgr(screen, &csi.params),

        // Modes
        (None, b'h') | (None, b'l') => {
            let value = csi.final_byte == b'h';
            for mode in csi.params.iter() {
                screen.set_mode(mode, value);
            }
        }
        (Some(b'?'), b'h') | (Some(b'?'), b'l') => {
            let value = csi.final_byte == b'h';
            for mode in csi.params.iter() {
                screen.set_dec_mode(mode, value);
            }
        }

        _ => trace!(?csi, "ignoring CSI"),
    }
}

/// Execute SGR (Select Graphic Rendition). Only affects characters printed
/// afterwards.
fn apply_sgr(screen: &mut Screen, params: &Params) {
    let attrs = screen.attrs_mut();
    if params.is_empty() {
        attrs.reset();
        return;
    }

    let mut i = 0;
    while i < params.len() {
        let code = params.raw(i);
        match code {
            0 => attrs.reset(),
            1 => attrs.bold = true,
            2 => attrs.faint = true,
            3 => attrs.italic = true,
            4 => attrs.underline = true,
            5 | 6 => attrs.blink = true,
            7 => attrs.inverse = true,
            8 => attrs.hidden = true,
            9 => attrs.strikethrough = true,
            21 => attrs.bold = false,
            22 => {
                attrs.bold = false;
                attrs.faint = false;
            }
            23 => attrs.italic = false,
            24 => attrs.underline = false,
            25 => attrs.blink = false,
            27 => attrs.inverse = false,
            28 => attrs.hidden = false,
            29 => attrs.strikethrough = false,
            30..=37 => attrs.fg = Color::Indexed((code - 30) as u8),
            39 => attrs.fg = Color::Default,
            40..=47 => attrs.bg = Color::Indexed((code - 40) as u8),
            49 => attrs.bg = Color::Default,
            90..=97 => attrs.fg = Color::Indexed((code - 90 + 8) as u8),
            100..=107 => attrs.bg = Color::Indexed((code - 100 + 8) as u8),
            38 | 48 => {
                let (color, consumed) = extended_color(params, i);
                if let Some(color) = color {
                    if code == 38 {
                        attrs.fg = color;
                    } else {
                        attrs.bg = color;
                    }
                }
                i += consumed;
            }
            _ => trace!(code, "ignoring SGR"),
        }
        i += 1;
    }
}

/// Parse an extended color starting at the 38/48 parameter at `index`.
/// Returns the color, if well formed, and how many following parameters
/// it used.
///
/// Accepts `38;5;n`, `38;2;r;g;b` and the colon forms `38:5:n`,
/// `38:2:r:g:b` and `38:2:cs:r:g:b`.
fn extended_color(params: &Params, index: usize) -> (Option<Color>, usize) {
    let channel = |v: u16| u8::try_from(v).ok();

    let sub = params.subparams(index);
    if !sub.is_empty() {
        let color = match sub {
            [5, n] => channel(*n).map(Color::Indexed),
            [2, r, g, b] | [2, _, r, g, b, ..] => {
                match (channel(*r), channel(*g), channel(*b)) {
                    (Some(r), Some(g), Some(b)) => Some(Color::rgb(r, g, b)),
                    _ => None,
                }
            }
            _ => None,
        };
        return (color, 0);
    }

    let remaining = params.len() - index - 1;
    match params.raw(index + 1) {
        5 if remaining >= 2 => (channel(params.raw(index + 2)).map(Color::Indexed), 2),
        2 if remaining >= 4 => {
            let rgb = (
                channel(params.raw(index + 2)),
                channel(params.raw(index + 3)),
                channel(params.raw(index + 4)),
            );
            match rgb {
                (Some(r), Some(g), Some(b)) => (Some(Color::rgb(r, g, b)), 4),
                _ => (None, 4),
            }
        }
        // Truncated or unknown color space: drop the rest of the sequence
        _ => (None, remaining),
    }
}
