//! Command submission transport
//!
//! Blocking HTTP client that POSTs submitted lines to the server's
//! shell endpoint and decodes the plain-text reply.

use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::shell::CommandReply;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
}

/// Client for the `/api/shell` endpoint
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport for the given server base URL
    pub fn new(server: &str) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder().build()?;
        let endpoint = format!("{}/api/shell", server.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }

    /// Submit one command line and decode the reply
    pub fn submit(&self, line: &str) -> Result<CommandReply, TransportError> {
        debug!("submitting to {}: {:?}", self.endpoint, line);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "cmd": line }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(CommandReply::from_wire(response.text()?))
    }
}
