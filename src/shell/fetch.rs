//! Outbound URL fetching for the `curl` command
//!
//! Wraps a blocking HTTP client with the bounds the interpreter relies
//! on: connect and overall timeouts plus a response-size ceiling.

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::debug;

/// Appended to a body cut off at the size ceiling
const TRUNCATION_MARKER: &str = "[truncated]";

/// Errors from an outbound fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Read(#[from] std::io::Error),
}

/// Bounded GET client
pub struct UrlFetcher {
    client: reqwest::blocking::Client,
    max_body_bytes: u64,
}

impl UrlFetcher {
    /// Build a fetcher with the given overall timeout and body ceiling
    pub fn new(timeout: Duration, max_body_bytes: u64) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// GET `url` and render the response as terminal output: a status
    /// line followed by the body text.
    pub fn get(&self, url: Url) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();

        let mut raw = Vec::new();
        response
            .take(self.max_body_bytes.saturating_add(1))
            .read_to_end(&mut raw)?;
        let truncated = raw.len() as u64 > self.max_body_bytes;
        if truncated {
            raw.truncate(self.max_body_bytes as usize);
        }

        let mut body = String::from_utf8_lossy(&raw).into_owned();
        if truncated {
            debug!("body truncated at {} bytes", self.max_body_bytes);
            body.push('\n');
            body.push_str(TRUNCATION_MARKER);
        }

        Ok(format!(
            "# HTTP {} {}\n{}",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_renders_status_and_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 4\r\nConnection: close\r\n\r\nbody".to_string(),
        );
        let fetcher = UrlFetcher::new(Duration::from_secs(5), 1024).expect("client");
        let output = fetcher.get(Url::parse(&url).expect("url")).expect("fetch");
        assert_eq!(output, "# HTTP 200 OK\nbody");
    }

    #[test]
    fn test_truncates_oversized_body() {
        let long = "x".repeat(64);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            long.len(),
            long
        );
        let url = serve_once(response);
        let fetcher = UrlFetcher::new(Duration::from_secs(5), 16).expect("client");
        let output = fetcher.get(Url::parse(&url).expect("url")).expect("fetch");
        assert_eq!(
            output,
            format!("# HTTP 200 OK\n{}\n{}", "x".repeat(16), TRUNCATION_MARKER)
        );
    }

    #[test]
    fn test_connection_refused_is_an_error() {
        let fetcher = UrlFetcher::new(Duration::from_secs(2), 1024).expect("client");
        let url = Url::parse("http://127.0.0.1:1/").expect("url");
        assert!(fetcher.get(url).is_err());
    }
}
