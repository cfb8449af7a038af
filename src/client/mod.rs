//! Native attach client
//!
//! A console front end for a running server, sharing the session
//! controller with the browser page:
//!
//! - **attach**: raw-mode event loop driving the terminal session
//! - **keymap**: crossterm key events to session input bytes
//! - **transport**: blocking HTTP submission of completed lines

pub mod attach;
pub mod keymap;
pub mod transport;

pub use attach::run_attach;
