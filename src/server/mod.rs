//! HTTP front end
//!
//! - **http**: minimal HTTP/1.1 request and response framing
//! - **service**: TCP listener, routing and command dispatch
//! - **page**: embedded browser terminal page
//!
//! # Architecture
//!
//! ```text
//! ShellServer
//! ├── TcpListener (one thread per connection)
//! ├── http (bounded request reading, response writing)
//! └── route
//!     ├── GET  /           -> terminal page
//!     └── POST /api/shell  -> shell::interpret
//! ```

pub mod http;
pub mod page;
pub mod service;

pub use service::ShellServer;
