//! Escape-sequence state machine
//!
//! A streaming parser modelled on the VT500-series state diagram
//! (<https://vt100.net/emu/dec_ansi_parser>), restricted to what the screen
//! buffer understands. State is kept between calls, so a sequence may be
//! split at any byte.
//!
//! OSC strings and the DCS/SOS/PM/APC family are consumed without keeping
//! or interpreting their payload. Nothing inside them can reach the screen.

use tracing::trace;

use super::action::{Action, CsiAction, EscAction, StringKind};
use super::params::Params;
use super::utf8::{Utf8Decoder, Utf8Result, REPLACEMENT_CHAR};

/// Upper bound on raw parameter bytes kept for one CSI sequence
const MAX_PARAM_BYTES: usize = 256;
/// Maximum number of intermediate bytes
const MAX_INTERMEDIATES: usize = 4;

const ESC: u8 = 0x1B;
const BEL: u8 = 0x07;
const CAN: u8 = 0x18;
const SUB: u8 = 0x1A;
const DEL: u8 = 0x7F;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Normal text processing
    Ground,
    /// After ESC
    Escape,
    /// ESC followed by one or more intermediate bytes (`ESC ( B`)
    EscapeIntermediate,
    /// After ESC [
    CsiEntry,
    /// Collecting CSI parameters
    CsiParam,
    /// Collecting CSI intermediate bytes
    CsiIntermediate,
    /// Malformed CSI sequence, consumed up to its final byte
    CsiIgnore,
    /// Inside an OSC string
    OscString,
    /// ESC seen inside an OSC string; `\` completes the ST terminator
    OscEscape,
    /// Inside a DCS, SOS, PM or APC string
    StringIgnore,
    /// ESC seen inside an ignored string
    StringEscape,
}

/// The escape-sequence parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    utf8: Utf8Decoder,
    /// Raw CSI parameter bytes (digits, `;` and `:`)
    params_buf: Vec<u8>,
    /// CSI intermediate bytes
    intermediates: Vec<u8>,
    /// CSI private marker
    marker: Option<u8>,
    /// ESC intermediate bytes
    esc_intermediates: Vec<u8>,
    /// Payload bytes consumed by the current OSC or ignored string
    string_len: usize,
    string_kind: StringKind,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            utf8: Utf8Decoder::new(),
            params_buf: Vec::with_capacity(64),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            marker: None,
            esc_intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            string_len: 0,
            string_kind: StringKind::Dcs,
        }
    }

    /// Get current parser state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reset parser to ground state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.utf8.reset();
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = None;
        self.esc_intermediates.clear();
        self.string_len = 0;
    }

    /// Parse a chunk of bytes, calling the callback for each action
    pub fn parse<F>(&mut self, data: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in data {
            self.advance(byte, &mut callback);
        }
    }

    /// Parse a chunk and collect actions into a vector
    pub fn parse_collect(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.parse(data, |action| actions.push(action));
        actions
    }

    /// Advance the parser by one byte
    fn advance<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.state {
            ParserState::Ground => self.ground(byte, callback),
            ParserState::OscString => self.osc_string(byte, callback),
            ParserState::OscEscape => self.osc_escape(byte, callback),
            ParserState::StringIgnore => self.string_ignore(byte),
            ParserState::StringEscape => self.string_escape(byte, callback),
            _ => {
                if !self.sequence_control(byte, callback) {
                    self.sequence_byte(byte, callback);
                }
            }
        }
    }

    fn ground<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        // A partial UTF-8 character interrupted by anything else
        if self.utf8.is_pending() && !Utf8Decoder::is_continuation(byte) {
            self.utf8.reset();
            callback(Action::Print(REPLACEMENT_CHAR));
        }

        match byte {
            0x20..=0x7E => callback(Action::Print(char::from(byte))),
            ESC => self.enter_escape(),
            BEL..=0x0D => callback(Action::Control(byte)),
            0x80..=0xFF => match self.utf8.feed(byte) {
                Utf8Result::Char(c) => callback(Action::Print(c)),
                Utf8Result::Invalid => callback(Action::Print(REPLACEMENT_CHAR)),
                Utf8Result::Pending => {}
            },
            // NUL, remaining C0 controls and DEL
            _ => {}
        }
    }

    /// C0 handling shared by the escape and CSI states. Returns true if the
    /// byte was consumed.
    fn sequence_control<F>(&mut self, byte: u8, callback: &mut F) -> bool
    where
        F: FnMut(Action),
    {
        match byte {
            ESC => self.enter_escape(),
            CAN | SUB => {
                trace!(state = ?self.state, "sequence cancelled");
                self.state = ParserState::Ground;
            }
            // Controls embedded in a sequence execute without ending it
            BEL..=0x0D => callback(Action::Control(byte)),
            0x00..=0x1F | DEL => {}
            _ => return false,
        }
        true
    }

    fn sequence_byte<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.state {
            ParserState::Escape => self.escape(byte, callback),
            ParserState::EscapeIntermediate => self.escape_intermediate(byte),
            ParserState::CsiEntry => self.csi_entry(byte, callback),
            ParserState::CsiParam => self.csi_param(byte, callback),
            ParserState::CsiIntermediate => self.csi_intermediate(byte, callback),
            ParserState::CsiIgnore => {
                if (0x40..=0x7E).contains(&byte) {
                    self.state = ParserState::Ground;
                }
            }
            ParserState::Ground
            | ParserState::OscString
            | ParserState::OscEscape
            | ParserState::StringIgnore
            | ParserState::StringEscape => {}
        }
    }

    fn enter_escape(&mut self) {
        self.state = ParserState::Escape;
        self.esc_intermediates.clear();
    }

    fn escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = match byte {
            b'[' => return self.enter_csi(),
            b']' => {
                self.state = ParserState::OscString;
                self.string_len = 0;
                return;
            }
            b'P' => return self.enter_string(ParserState::StringIgnore, StringKind::Dcs),
            b'X' => return self.enter_string(ParserState::StringIgnore, StringKind::Sos),
            b'^' => return self.enter_string(ParserState::StringIgnore, StringKind::Pm),
            b'_' => return self.enter_string(ParserState::StringIgnore, StringKind::Apc),
            0x20..=0x2F => {
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
                return;
            }
            b'7' => EscAction::SaveCursor,
            b'8' => EscAction::RestoreCursor,
            b'D' => EscAction::Index,
            b'M' => EscAction::ReverseIndex,
            b'E' => EscAction::NextLine,
            b'c' => EscAction::FullReset,
            _ => {
                trace!(byte, "unrecognized ESC sequence discarded");
                self.state = ParserState::Ground;
                return;
            }
        };
        self.state = ParserState::Ground;
        callback(Action::Esc(action));
    }

    fn escape_intermediate(&mut self, byte: u8) {
        match byte {
            0x20..=0x2F => {
                if self.esc_intermediates.len() < MAX_INTERMEDIATES {
                    self.esc_intermediates.push(byte);
                }
            }
            _ => {
                // Charset designations and the like; the screen has no use for them
                trace!(
                    intermediates = ?self.esc_intermediates,
                    byte,
                    "ESC sequence with intermediates discarded"
                );
                self.state = ParserState::Ground;
            }
        }
    }

    fn enter_csi(&mut self) {
        self.state = ParserState::CsiEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = None;
    }

    fn csi_entry<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'?' | b'>' | b'<' | b'=' => {
                self.marker = Some(byte);
                self.state = ParserState::CsiParam;
            }
            _ => self.csi_param(byte, callback),
        }
    }

    fn csi_param<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' | b';' | b':' => {
                if self.params_buf.len() < MAX_PARAM_BYTES {
                    self.params_buf.push(byte);
                }
                self.state = ParserState::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            // Private marker in the wrong position, or a non-ASCII byte
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn csi_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F if self.intermediates.len() < MAX_INTERMEDIATES => {
                self.intermediates.push(byte);
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn dispatch_csi<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        self.state = ParserState::Ground;
        callback(Action::Csi(CsiAction {
            params: Params::parse(&self.params_buf),
            intermediates: self.intermediates.clone(),
            final_byte,
            marker: self.marker,
        }));
    }

    fn enter_string(&mut self, state: ParserState, kind: StringKind) {
        self.state = state;
        self.string_kind = kind;
        self.string_len = 0;
    }

    fn osc_string<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            BEL => self.finish_osc(callback),
            ESC => self.state = ParserState::OscEscape,
            _ => self.string_len = self.string_len.saturating_add(1),
        }
    }

    fn osc_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        // Only ST ends the string; any other ESC pair stays payload
        if byte == b'\\' {
            return self.finish_osc(callback);
        }
        self.string_len = self.string_len.saturating_add(1);
        if byte != ESC {
            self.state = ParserState::OscString;
            self.osc_string(byte, callback);
        }
    }

    fn finish_osc<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let len = self.string_len;
        self.state = ParserState::Ground;
        self.string_len = 0;
        callback(Action::OscConsumed { len });
    }

    fn string_ignore(&mut self, byte: u8) {
        match byte {
            ESC => self.state = ParserState::StringEscape,
            _ => self.string_len = self.string_len.saturating_add(1),
        }
    }

    fn string_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if byte == b'\\' {
            let (kind, len) = (self.string_kind, self.string_len);
            self.state = ParserState::Ground;
            self.string_len = 0;
            return callback(Action::StringConsumed { kind, len });
        }
        self.string_len = self.string_len.saturating_add(1);
        if byte != ESC {
            self.state = ParserState::StringIgnore;
            self.string_ignore(byte);
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Print(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parser_print() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"Hello");

        assert_eq!(actions.len(), 5);
        assert_eq!(actions[0], Action::Print('H'));
        assert_eq!(actions[4], Action::Print('o'));
    }

    #[test]
    fn test_parser_control() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x07\x08\x09\x0A\x0D\x00\x7F");

        assert_eq!(
            actions,
            vec![
                Action::Control(0x07),
                Action::Control(0x08),
                Action::Control(0x09),
                Action::Control(0x0A),
                Action::Control(0x0D),
            ]
        );
    }

    #[test]
    fn test_parser_csi_cursor() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[10;20H");

        assert_eq!(actions.len(), 1);
        if let Action::Csi(csi) = &actions[0] {
            assert_eq!(csi.final_byte, b'H');
            assert_eq!(csi.param(0, 1), 10);
            assert_eq!(csi.param(1, 1), 20);
            assert_eq!(csi.marker, None);
        } else {
            panic!("Expected CSI action");
        }
    }

    #[test]
    fn test_parser_csi_private() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[?25h\x1b[>0c");

        assert_eq!(actions.len(), 2);
        match &actions[0] {
            Action::Csi(csi) => {
                assert!(csi.is_private(b'h'));
                assert_eq!(csi.param(0, 0), 25);
            }
            other => panic!("Expected CSI action, got {:?}", other),
        }
        match &actions[1] {
            Action::Csi(csi) => assert_eq!(csi.marker, Some(b'>')),
            other => panic!("Expected CSI action, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_csi_misplaced_marker_ignored() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[1?2mA");
        assert_eq!(actions, vec![Action::Print('A')]);
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_parser_csi_intermediate() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[2 q");

        assert_eq!(actions.len(), 1);
        if let Action::Csi(csi) = &actions[0] {
            assert_eq!(csi.intermediates, vec![b' ']);
            assert_eq!(csi.final_byte, b'q');
            assert!(!csi.is(b'q'));
        } else {
            panic!("Expected CSI action");
        }
    }

    #[test]
    fn test_parser_control_inside_csi() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[1\r;2H");

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], Action::Control(0x0D));
        if let Action::Csi(csi) = &actions[1] {
            assert_eq!(csi.param(1, 1), 2);
        } else {
            panic!("Expected CSI action");
        }
    }

    #[test]
    fn test_parser_cancel() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b[31\x18m");
        assert_eq!(actions, vec![Action::Print('m')]);
    }

    #[test]
    fn test_parser_esc_save_restore() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b7\x1b8");

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], Action::Esc(EscAction::SaveCursor));
        assert_eq!(actions[1], Action::Esc(EscAction::RestoreCursor));
    }

    #[test]
    fn test_parser_esc_index() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1bD\x1bM\x1bE\x1bc");

        assert_eq!(
            actions,
            vec![
                Action::Esc(EscAction::Index),
                Action::Esc(EscAction::ReverseIndex),
                Action::Esc(EscAction::NextLine),
                Action::Esc(EscAction::FullReset),
            ]
        );
    }

    #[test]
    fn test_parser_unknown_esc_discarded() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1bZ\x1b=\x1b(BX");
        assert_eq!(actions, vec![Action::Print('X')]);
    }

    #[test]
    fn test_parser_osc_bel() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b]0;My Title\x07");
        assert_eq!(actions, vec![Action::OscConsumed { len: 10 }]);
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_parser_osc_st() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1b]8;;https://example.com\x1b\\after");

        assert_eq!(actions[0], Action::OscConsumed { len: 22 });
        assert_eq!(printed(&actions), "after");
    }

    #[test]
    fn test_parser_osc_payload_never_escapes() {
        let mut parser = Parser::new();
        // Sequences, controls and CAN inside the payload are all payload
        let actions =
            parser.parse_collect(b"\x1b]2;\x1b[31mEVIL\r\n\x18\x1b7\x1b\x1b\\ok");

        assert!(matches!(actions[0], Action::OscConsumed { .. }));
        assert_eq!(actions.len(), 3);
        assert_eq!(printed(&actions), "ok");
    }

    #[test]
    fn test_parser_osc_split_terminator() {
        let mut parser = Parser::new();
        assert!(parser.parse_collect(b"\x1b]0;title\x1b").is_empty());
        assert_eq!(parser.state(), ParserState::OscEscape);

        let actions = parser.parse_collect(b"\\X");
        assert_eq!(actions[0], Action::OscConsumed { len: 7 });
        assert_eq!(actions[1], Action::Print('X'));
    }

    #[test]
    fn test_parser_dcs_swallowed() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\x1bPq#0;2;0;0;0\x07more\x1b\\A\x1b_apc\x1b\\");

        assert_eq!(
            actions,
            vec![
                Action::StringConsumed {
                    kind: StringKind::Dcs,
                    len: 16,
                },
                Action::Print('A'),
                Action::StringConsumed {
                    kind: StringKind::Apc,
                    len: 3,
                },
            ]
        );
    }

    #[test]
    fn test_parser_utf8() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect("Hello 世界 🎉".as_bytes());
        assert_eq!(printed(&actions), "Hello 世界 🎉");
    }

    #[test]
    fn test_parser_invalid_utf8_replaced() {
        let mut parser = Parser::new();
        let actions = parser.parse_collect(b"\xC3A\xFF\xC3\xA9");
        assert_eq!(printed(&actions), "\u{FFFD}A\u{FFFD}é");
    }

    #[test]
    fn test_parser_streaming() {
        let mut parser = Parser::new();

        let actions1 = parser.parse_collect(b"\x1b[10");
        assert!(actions1.is_empty());
        assert_eq!(parser.state(), ParserState::CsiParam);

        let actions2 = parser.parse_collect(b";20H");
        assert_eq!(actions2.len(), 1);
        if let Action::Csi(csi) = &actions2[0] {
            assert_eq!(csi.param(0, 1), 10);
            assert_eq!(csi.param(1, 1), 20);
        } else {
            panic!("Expected CSI action");
        }
    }

    #[test]
    fn test_parser_streaming_every_split() {
        let input = b"a\x1b[1;31mb\x1b]0;t\x07c\x1b7\xe4\xb8\xadd";
        let expected = Parser::new().parse_collect(input);

        for split in 0..=input.len() {
            let mut parser = Parser::new();
            let mut actions = parser.parse_collect(&input[..split]);
            actions.extend(parser.parse_collect(&input[split..]));
            assert_eq!(actions, expected, "split at {}", split);
        }
    }

    #[test]
    fn test_parser_streaming_utf8() {
        let mut parser = Parser::new();

        assert!(parser.parse_collect(&[0xE4]).is_empty());
        assert!(parser.parse_collect(&[0xB8]).is_empty());
        assert_eq!(parser.parse_collect(&[0xAD]), vec![Action::Print('中')]);
    }

    #[test]
    fn test_parser_reset() {
        let mut parser = Parser::new();

        parser.parse_collect(b"\x1b[10");
        assert_eq!(parser.state(), ParserState::CsiParam);

        parser.reset();
        assert_eq!(parser.state(), ParserState::Ground);

        let actions = parser.parse_collect(b"A");
        assert_eq!(actions[0], Action::Print('A'));
    }
}
