//! Input byte decoder
//!
//! Recognizes the small input alphabet a session understands: printable
//! ASCII, carriage return, DEL and the bare Up/Down CSI sequences.
//! Everything else, including unfinished or modified escape sequences,
//! decodes to nothing.

/// A recognized input key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable ASCII character (0x20 to 0x7E)
    Char(char),
    /// Carriage return (0x0D)
    Enter,
    /// DEL (0x7F)
    Backspace,
    /// Bare `ESC [ A`
    Up,
    /// Bare `ESC [ B`
    Down,
}

/// Decoder state
#[derive(Clone, Copy, Default, PartialEq)]
enum DecoderState {
    /// Normal input
    #[default]
    Ground,
    /// After ESC
    Escape,
    /// After `ESC [`, collecting a control sequence
    Csi,
}

/// Byte-at-a-time decoder from raw input to [`Key`] events
pub struct InputDecoder {
    state: DecoderState,
    /// A parameter or intermediate byte was seen in the current sequence
    params_seen: bool,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Ground,
            params_seen: false,
        }
    }

    /// Feed one byte; returns a key when one is recognized
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        // ESC restarts sequence recognition from any state
        if byte == 0x1B {
            self.state = DecoderState::Escape;
            return None;
        }

        match self.state {
            DecoderState::Ground => self.ground(byte),
            DecoderState::Escape => self.escape(byte),
            DecoderState::Csi => self.csi(byte),
        }
    }

    fn ground(&mut self, byte: u8) -> Option<Key> {
        match byte {
            0x0D => Some(Key::Enter),
            0x7F => Some(Key::Backspace),
            0x20..=0x7E => Some(Key::Char(byte as char)),
            // LF, other C0 controls and non-ASCII bytes are inert
            _ => None,
        }
    }

    fn escape(&mut self, byte: u8) -> Option<Key> {
        match byte {
            b'[' => {
                self.state = DecoderState::Csi;
                self.params_seen = false;
            }
            // Not a CSI introducer; drop the two-byte sequence whole
            _ => self.state = DecoderState::Ground,
        }
        None
    }

    fn csi(&mut self, byte: u8) -> Option<Key> {
        match byte {
            // Parameter and intermediate bytes
            0x20..=0x3F => {
                self.params_seen = true;
                None
            }
            // Final byte ends the sequence; only bare arrows mean anything
            0x40..=0x7E => {
                self.state = DecoderState::Ground;
                if self.params_seen {
                    return None;
                }
                match byte {
                    b'A' => Some(Key::Up),
                    b'B' => Some(Key::Down),
                    _ => None,
                }
            }
            // Control byte inside a sequence, abandon it
            _ => {
                self.state = DecoderState::Ground;
                None
            }
        }
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(decoder: &mut InputDecoder, bytes: &[u8]) -> Vec<Key> {
        bytes.iter().filter_map(|byte| decoder.feed(*byte)).collect()
    }

    #[test]
    fn test_printable_bytes() {
        let mut decoder = InputDecoder::new();
        assert_eq!(decoder.feed(b'a'), Some(Key::Char('a')));
        assert_eq!(decoder.feed(b' '), Some(Key::Char(' ')));
        assert_eq!(decoder.feed(b'~'), Some(Key::Char('~')));
    }

    #[test]
    fn test_control_bytes() {
        let mut decoder = InputDecoder::new();
        assert_eq!(decoder.feed(0x0D), Some(Key::Enter));
        assert_eq!(decoder.feed(0x7F), Some(Key::Backspace));
        // LF and BS are not part of the input alphabet
        assert_eq!(decoder.feed(0x0A), None);
        assert_eq!(decoder.feed(0x08), None);
    }

    #[test]
    fn test_arrow_sequences() {
        let mut decoder = InputDecoder::new();
        assert_eq!(feed_all(&mut decoder, b"\x1b[A"), vec![Key::Up]);
        assert_eq!(feed_all(&mut decoder, b"\x1b[B"), vec![Key::Down]);
    }

    #[test]
    fn test_modified_arrow_is_inert() {
        let mut decoder = InputDecoder::new();
        assert_eq!(feed_all(&mut decoder, b"\x1b[1;5A"), vec![]);
        // Back in ground state afterwards
        assert_eq!(decoder.feed(b'x'), Some(Key::Char('x')));
    }

    #[test]
    fn test_other_csi_finals_are_swallowed() {
        let mut decoder = InputDecoder::new();
        // Right arrow and Home have no meaning here
        assert_eq!(feed_all(&mut decoder, b"\x1b[C"), vec![]);
        assert_eq!(feed_all(&mut decoder, b"\x1b[H"), vec![]);
        assert_eq!(decoder.feed(b'x'), Some(Key::Char('x')));
    }

    #[test]
    fn test_unknown_escape_dropped() {
        let mut decoder = InputDecoder::new();
        assert_eq!(feed_all(&mut decoder, b"\x1bx"), vec![]);
        assert_eq!(decoder.feed(b'y'), Some(Key::Char('y')));
    }

    #[test]
    fn test_esc_restarts_recognition() {
        let mut decoder = InputDecoder::new();
        // A second ESC mid-sequence starts over cleanly
        assert_eq!(feed_all(&mut decoder, b"\x1b\x1b[A"), vec![Key::Up]);
        assert_eq!(feed_all(&mut decoder, b"\x1b[\x1b[B"), vec![Key::Down]);
    }

    #[test]
    fn test_text_around_sequences() {
        let mut decoder = InputDecoder::new();
        let keys = feed_all(&mut decoder, b"ab\x1b[A\rc");
        assert_eq!(
            keys,
            vec![
                Key::Char('a'),
                Key::Char('b'),
                Key::Up,
                Key::Enter,
                Key::Char('c'),
            ]
        );
    }
}
