//! Terminal session handling
//!
//! The interactive half of the shell: a byte-level input decoder and a
//! session controller that owns the edit line, history and busy gate.
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── InputDecoder (raw bytes -> Key events)
//! ├── edit line, history, history cursor, busy gate
//! └── TermView (rendering surface)
//! ```
//!
//! Submitted lines leave through [`Session::feed`]; their outcome comes
//! back through [`Session::complete`].

pub mod input;
pub mod session;

pub use session::{Session, TermView};
