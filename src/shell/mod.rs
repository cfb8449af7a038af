//! Command interpretation and outbound fetching
//!
//! The stateless server half of the shell:
//!
//! - **command**: dispatch from a command line to a [`CommandReply`]
//! - **fetch**: bounded HTTP GET backing the `curl` command
//!
//! A [`CommandReply`] is either plain text or a clear signal; the wire
//! form used by the HTTP endpoint is handled by
//! [`CommandReply::to_wire`] and [`CommandReply::from_wire`].

pub mod command;
pub mod fetch;

pub use command::{interpret, CommandReply};
pub use fetch::{FetchError, UrlFetcher};
