//! Interactive attach loop
//!
//! Drives a [`Session`] from the current console in raw mode,
//! submitting completed lines over the HTTP transport. The console
//! renders exactly what the browser page renders.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use tracing::{debug, info};

use crate::term::{Session, TermView};

use super::keymap::KeyMapper;
use super::transport::HttpTransport;

/// Console-backed rendering surface
struct ConsoleView {
    stdout: io::Stdout,
}

impl TermView for ConsoleView {
    fn write(&mut self, text: &str) {
        let _ = self.stdout.write_all(text.as_bytes());
        let _ = self.stdout.flush();
    }

    fn clear(&mut self) {
        let _ = execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0));
    }
}

/// Raw mode guard; restores the console on drop
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Attach to a running server and drive an interactive session from
/// this console. Returns when the user presses Ctrl+C.
pub fn run_attach(server: &str) -> anyhow::Result<()> {
    let transport = HttpTransport::new(server)?;
    info!("attaching to {}", server);

    let _raw = RawMode::enable()?;
    let mut session = Session::new(ConsoleView {
        stdout: io::stdout(),
    });
    session.start();

    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            if is_detach(&key_event) {
                break;
            }
            if let Some(bytes) = KeyMapper::map(&key_event) {
                if let Some(line) = session.feed(&bytes) {
                    let result = transport.submit(&line).map_err(|err| err.to_string());
                    // Keys typed during the round trip hit the busy
                    // gate and are dropped, not replayed
                    drain_pending(&mut session)?;
                    session.complete(result);
                }
            }
        }
    }

    // Leave the shell on a fresh line
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\r\n");
    let _ = stdout.flush();
    info!("detached from {}", server);
    Ok(())
}

/// Feed every event queued while a request was in flight
fn drain_pending<V: TermView>(session: &mut Session<V>) -> io::Result<()> {
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(bytes) = KeyMapper::map(&key_event) {
                debug!("draining queued input");
                session.feed(&bytes);
            }
        }
    }
    Ok(())
}

fn is_detach(event: &KeyEvent) -> bool {
    event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_key() {
        assert!(is_detach(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_detach(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
        assert!(!is_detach(&KeyEvent::new(
            KeyCode::Char('d'),
            KeyModifiers::CONTROL
        )));
    }
}
