//! Listener loop and request routing
//!
//! Binds the configured address and serves the terminal page and the
//! shell endpoint, one thread per connection. All state shared across
//! connections is the fetcher; command interpretation itself is
//! stateless.

use std::io::BufReader;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::shell::{self, FetchError, UrlFetcher};

use super::http::{self, Request};
use super::page;

const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// HTTP front end for the command interpreter
pub struct ShellServer {
    listen: String,
    fetcher: Arc<UrlFetcher>,
}

impl ShellServer {
    /// Build a server from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let fetcher = UrlFetcher::new(
            Duration::from_secs(config.fetch.timeout_secs),
            config.fetch.max_body_bytes,
        )?;
        Ok(Self {
            listen: config.server.listen.clone(),
            fetcher: Arc::new(fetcher),
        })
    }

    /// Bind and serve until the process is stopped
    pub fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.listen)?;
        info!("listening on http://{}", listener.local_addr()?);

        let connections = AtomicU64::new(0);
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("accept failed: {}", err);
                    continue;
                }
            };

            let id = connections.fetch_add(1, Ordering::Relaxed);
            let fetcher = Arc::clone(&self.fetcher);
            let spawned = thread::Builder::new()
                .name(format!("shell-conn-{}", id))
                .spawn(move || handle_connection(stream, &fetcher));
            if let Err(err) = spawned {
                warn!("failed to spawn connection thread: {}", err);
            }
        }

        Ok(())
    }
}

/// Serve one connection: read a single request, answer it, close
pub(crate) fn handle_connection(stream: TcpStream, fetcher: &UrlFetcher) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let mut reader = BufReader::new(&stream);
    let request = match http::read_request(&mut reader) {
        Ok(request) => request,
        Err(err) => {
            debug!("bad request from {}: {}", peer, err);
            let _ = http::write_response(&mut &stream, 400, CONTENT_TYPE_TEXT, "Bad Request");
            return;
        }
    };

    let reply = route(&request, fetcher);
    debug!(
        "{} {} {} -> {}",
        peer, request.method, request.path, reply.status
    );
    if let Err(err) =
        http::write_response(&mut &stream, reply.status, reply.content_type, &reply.body)
    {
        debug!("write to {} failed: {}", peer, err);
    }
}

struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            body: body.into(),
        }
    }

    fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_HTML,
            body: body.into(),
        }
    }
}

fn route(request: &Request, fetcher: &UrlFetcher) -> Reply {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => Reply::html(page::TERMINAL_PAGE),
        ("POST", "/api/shell") => {
            let body: Value = match serde_json::from_slice(&request.body) {
                Ok(body) => body,
                Err(err) => {
                    debug!("unparseable shell request body: {}", err);
                    return Reply::text(400, "Invalid JSON");
                }
            };
            // A missing or non-string cmd field reads as an empty command
            let cmd = body.get("cmd").and_then(Value::as_str).unwrap_or("");
            let reply = shell::interpret(cmd, fetcher);
            Reply::text(200, reply.to_wire())
        }
        (_, "/api/shell") => Reply::text(405, "Method Not Allowed"),
        _ => Reply::text(404, "Not Found"),
    }
}
