//! Key encoding for session input
//!
//! Converts crossterm key events into the byte alphabet the session
//! decoder understands. Keys outside that alphabet encode to nothing
//! and never reach the session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Encoder from key events to session input bytes
pub struct KeyMapper;

impl KeyMapper {
    /// Map a key event; `None` means the key is not part of the alphabet
    pub fn map(event: &KeyEvent) -> Option<Vec<u8>> {
        // Shift is part of ordinary typing; any other modifier takes
        // the key out of the alphabet
        if !event.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return None;
        }

        match event.code {
            KeyCode::Char(ch) if (' '..='~').contains(&ch) => Some(vec![ch as u8]),
            KeyCode::Enter => Some(vec![0x0D]),
            KeyCode::Backspace => Some(vec![0x7F]),
            KeyCode::Up => Some(b"\x1b[A".to_vec()),
            KeyCode::Down => Some(b"\x1b[B".to_vec()),
            _ => None,
        }
    }
}
