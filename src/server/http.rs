//! Minimal HTTP/1.1 framing
//!
//! Just enough request reading and response writing for the shell
//! endpoint. One request per connection, always answered with
//! `Connection: close`. Head and body sizes are bounded before any
//! allocation happens.

use std::collections::HashMap;
use std::io::{BufRead, Read, Write};

use thiserror::Error;

/// Upper bound on the request line plus all header lines
pub const MAX_HEAD_BYTES: usize = 8 * 1024;
/// Upper bound on a request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed request line")]
    BadRequestLine,
    #[error("malformed header line")]
    BadHeader,
    #[error("invalid Content-Length")]
    BadContentLength,
    #[error("request too large")]
    TooLarge,
    #[error("connection closed early")]
    Eof,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HttpError>;

/// A parsed request
#[derive(Debug)]
pub struct Request {
    pub method: String,
    /// Path component of the request target, query string stripped
    pub path: String,
    /// Header values keyed by lowercased name
    #[allow(dead_code)]
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

/// Read one request from the stream
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request> {
    let mut head_bytes = 0;

    let request_line = read_line(reader, &mut head_bytes)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or(HttpError::BadRequestLine)?.to_string();
    let target = parts.next().ok_or(HttpError::BadRequestLine)?;
    if parts.next().is_none() {
        // No HTTP version
        return Err(HttpError::BadRequestLine);
    }
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = HashMap::new();
    loop {
        let line = read_line(reader, &mut head_bytes)?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').ok_or(HttpError::BadHeader)?;
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    let body = match headers.get("content-length") {
        Some(value) => {
            let length: usize = value.parse().map_err(|_| HttpError::BadContentLength)?;
            if length > MAX_BODY_BYTES {
                return Err(HttpError::TooLarge);
            }
            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).map_err(|err| {
                if err.kind() == std::io::ErrorKind::UnexpectedEof {
                    HttpError::Eof
                } else {
                    HttpError::Io(err)
                }
            })?;
            body
        }
        None => Vec::new(),
    };

    Ok(Request {
        method,
        path,
        headers,
        body,
    })
}

/// Read one CRLF-terminated line, counted against the head budget
fn read_line<R: BufRead>(reader: &mut R, head_bytes: &mut usize) -> Result<String> {
    let remaining = MAX_HEAD_BYTES.saturating_sub(*head_bytes);
    let mut buf = Vec::new();
    let n = reader
        .by_ref()
        .take(remaining as u64 + 1)
        .read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Err(HttpError::Eof);
    }
    if n > remaining {
        return Err(HttpError::TooLarge);
    }
    *head_bytes += n;

    if buf.last() != Some(&b'\n') {
        // Stream ended mid-line
        return Err(HttpError::Eof);
    }
    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf).map_err(|_| HttpError::BadHeader)
}

/// Write a complete response and flush
pub fn write_response<W: Write>(
    writer: &mut W,
    status: u16,
    content_type: &str,
    body: &str,
) -> std::io::Result<()> {
    write!(
        writer,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason_phrase(status),
        content_type,
        body.len()
    )?;
    writer.write_all(body.as_bytes())?;
    writer.flush()
}

/// Reason phrase for the statuses this server emits
fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_get_request() {
        let mut input = Cursor::new(b"GET /?q=1 HTTP/1.1\r\nHost: localhost\r\n\r\n".to_vec());
        let request = read_request(&mut input).expect("request");
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/");
        assert_eq!(
            request.headers.get("host").map(String::as_str),
            Some("localhost")
        );
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_parse_post_with_body() {
        let mut input = Cursor::new(
            b"POST /api/shell HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 14\r\n\r\n{\"cmd\":\"help\"}"
                .to_vec(),
        );
        let request = read_request(&mut input).expect("request");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/shell");
        assert_eq!(request.body, b"{\"cmd\":\"help\"}");
    }

    #[test]
    fn test_header_names_are_lowercased() {
        let mut input =
            Cursor::new(b"GET / HTTP/1.1\r\nX-Custom-Header:  padded \r\n\r\n".to_vec());
        let request = read_request(&mut input).expect("request");
        assert_eq!(
            request.headers.get("x-custom-header").map(String::as_str),
            Some("padded")
        );
    }

    #[test]
    fn test_short_body_is_eof() {
        let mut input =
            Cursor::new(b"POST /api/shell HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc".to_vec());
        assert!(matches!(read_request(&mut input), Err(HttpError::Eof)));
    }

    #[test]
    fn test_bad_content_length() {
        let mut input = Cursor::new(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n".to_vec());
        assert!(matches!(
            read_request(&mut input),
            Err(HttpError::BadContentLength)
        ));
    }

    #[test]
    fn test_oversized_body_rejected() {
        let head = format!(
            "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let mut input = Cursor::new(head.into_bytes());
        assert!(matches!(read_request(&mut input), Err(HttpError::TooLarge)));
    }

    #[test]
    fn test_oversized_head_rejected() {
        let mut head = String::from("GET / HTTP/1.1\r\n");
        while head.len() <= MAX_HEAD_BYTES {
            head.push_str("X-Filler: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n");
        }
        head.push_str("\r\n");
        let mut input = Cursor::new(head.into_bytes());
        assert!(matches!(read_request(&mut input), Err(HttpError::TooLarge)));
    }

    #[test]
    fn test_malformed_request_line() {
        let mut input = Cursor::new(b"GARBAGE\r\n\r\n".to_vec());
        assert!(matches!(
            read_request(&mut input),
            Err(HttpError::BadRequestLine)
        ));
    }

    #[test]
    fn test_write_response_frames_body() {
        let mut out = Vec::new();
        write_response(&mut out, 200, "text/plain; charset=utf-8", "hi").expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\nhi"));
    }

    #[test]
    fn test_write_response_reason_phrases() {
        for (status, phrase) in [(400, "Bad Request"), (404, "Not Found"), (405, "Method Not Allowed")] {
            let mut out = Vec::new();
            write_response(&mut out, status, "text/plain; charset=utf-8", "").expect("write");
            let text = String::from_utf8(out).expect("utf8");
            assert!(text.starts_with(&format!("HTTP/1.1 {} {}\r\n", status, phrase)));
        }
    }
}
