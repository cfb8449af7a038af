//! Terminal session controller
//!
//! Owns the line-editing state for one interactive session: the edit
//! buffer, the command history with its cursor, and the busy gate that
//! serializes submissions. All rendering goes through [`TermView`].

use std::mem;

use tracing::debug;

use crate::shell::CommandReply;

use super::input::{InputDecoder, Key};

/// Prompt shown at the start of every input line
pub const PROMPT: &str = "$ ";

/// Rendering surface a session draws on
pub trait TermView {
    /// Write raw output; may contain CR, LF and backspace controls
    fn write(&mut self, text: &str);
    /// Reset the viewport to an empty screen
    fn clear(&mut self);
}

/// Line-editing session over a [`TermView`]
pub struct Session<V: TermView> {
    view: V,
    decoder: InputDecoder,
    /// Current edit line; the decoder only admits printable ASCII, so
    /// byte length equals column count
    line: String,
    /// Submitted commands, oldest first
    history: Vec<String>,
    /// Index into `history`, or `history.len()` for the fresh line
    cursor: usize,
    /// A submission is in flight; input is dropped until [`Session::complete`]
    busy: bool,
}

impl<V: TermView> Session<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            decoder: InputDecoder::new(),
            line: String::new(),
            history: Vec::new(),
            cursor: 0,
            busy: false,
        }
    }

    /// Reset the viewport and show the banner and a fresh prompt
    pub fn start(&mut self) {
        self.view.clear();
        self.view.write("pseudosh (pseudo bash)\r\n");
        self.view.write("Type 'help' to see available commands.\r\n");
        self.view.write(PROMPT);
        self.line.clear();
    }

    /// Feed raw input bytes; returns a command line when one is submitted.
    ///
    /// At most one line can come back per call: submitting flips the
    /// busy gate, which drops every remaining key in the batch.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<String> {
        let mut submitted = None;
        for &byte in bytes {
            if let Some(key) = self.decoder.feed(byte) {
                if let Some(line) = self.handle_key(key) {
                    submitted = Some(line);
                }
            }
        }
        submitted
    }

    /// Deliver the outcome of a submitted command and re-arm the prompt
    pub fn complete(&mut self, result: Result<CommandReply, String>) {
        match result {
            Ok(CommandReply::Clear) => self.start(),
            Ok(CommandReply::Text(text)) => {
                if !text.is_empty() {
                    self.view.write(&text.replace('\n', "\r\n"));
                    self.view.write("\r\n");
                }
                self.view.write(PROMPT);
            }
            Err(message) => {
                self.view.write(&format!("Error: {}\r\n", message));
                self.view.write(PROMPT);
            }
        }
        self.busy = false;
    }

    /// A submission is in flight
    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Submitted commands, oldest first
    #[allow(dead_code)]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Current edit line
    #[allow(dead_code)]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Rendering surface
    #[allow(dead_code)]
    pub fn view(&self) -> &V {
        &self.view
    }

    fn handle_key(&mut self, key: Key) -> Option<String> {
        if self.busy {
            debug!("dropping key during in-flight command: {:?}", key);
            return None;
        }

        match key {
            Key::Char(ch) => {
                self.line.push(ch);
                self.view.write(&ch.to_string());
                None
            }
            Key::Backspace => {
                if self.line.pop().is_some() {
                    self.view.write("\x08 \x08");
                }
                None
            }
            Key::Up => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let entry = self.history[self.cursor].clone();
                    self.replace_line(&entry);
                }
                None
            }
            Key::Down => {
                if self.cursor + 1 < self.history.len() {
                    self.cursor += 1;
                    let entry = self.history[self.cursor].clone();
                    self.replace_line(&entry);
                } else {
                    // Past the newest entry, back to a fresh empty line
                    self.cursor = self.history.len();
                    self.replace_line("");
                }
                None
            }
            Key::Enter => self.submit(),
        }
    }

    fn submit(&mut self) -> Option<String> {
        self.view.write("\r\n");
        let line = mem::take(&mut self.line);
        if line.trim().is_empty() {
            self.view.write(PROMPT);
            return None;
        }

        self.history.push(line.clone());
        self.cursor = self.history.len();
        self.busy = true;
        debug!("submitting command: {:?}", line);
        Some(line)
    }

    /// Erase the current line on screen and replace it with `text`
    fn replace_line(&mut self, text: &str) {
        for _ in 0..self.line.len() {
            self.view.write("\x08 \x08");
        }
        self.line.clear();
        self.line.push_str(text);
        self.view.write(text);
    }
}
