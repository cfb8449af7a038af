//! Command interpretation
//!
//! Maps one submitted command line to a [`CommandReply`]. Interpretation
//! is stateless and total: every input, including garbage, produces a
//! normal reply. Only `curl` performs I/O.

use tracing::warn;

use super::fetch::UrlFetcher;

/// Wire token standing in for [`CommandReply::Clear`] in response bodies
pub const CLEAR_TOKEN: &str = "__CLEAR__";

const HELP_TEXT: &str = "\
pseudosh - pseudo Bash

Available commands:
  help              show this help
  echo <text>       print text
  curl <url>        fetch a URL and show the response text
  clear             clear the screen (handled by the client)

Examples:
  echo hello
  curl https://example.com";

/// Outcome of interpreting one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// Ordinary text output
    Text(String),
    /// Reset the client viewport
    Clear,
}

impl CommandReply {
    /// Encode for a plain-text response body
    pub fn to_wire(&self) -> &str {
        match self {
            CommandReply::Text(text) => text,
            CommandReply::Clear => CLEAR_TOKEN,
        }
    }

    /// Decode a plain-text response body
    pub fn from_wire(body: String) -> Self {
        if body == CLEAR_TOKEN {
            CommandReply::Clear
        } else {
            CommandReply::Text(body)
        }
    }
}

/// Interpret one raw command line.
///
/// Dispatch happens on the trimmed input. The `echo` remainder is kept
/// exactly as written after the command word and its separating space.
pub fn interpret(raw: &str, fetcher: &UrlFetcher) -> CommandReply {
    let cmd = raw.trim();

    if cmd.is_empty() {
        return CommandReply::Text(String::new());
    }

    if cmd == "help" {
        return CommandReply::Text(HELP_TEXT.to_string());
    }

    if cmd == "clear" {
        return CommandReply::Clear;
    }

    // Bare echo prints an empty line
    if cmd == "echo" {
        return CommandReply::Text(String::new());
    }
    if let Some(rest) = cmd.strip_prefix("echo ") {
        return CommandReply::Text(rest.to_string());
    }

    if cmd == "curl" || cmd.starts_with("curl ") {
        let url = cmd.strip_prefix("curl").unwrap_or_default().trim();
        return CommandReply::Text(run_curl(url, fetcher));
    }

    CommandReply::Text(format!(
        "Command not found: {}\nType 'help' to see available commands.",
        cmd
    ))
}

fn run_curl(url: &str, fetcher: &UrlFetcher) -> String {
    let target = match reqwest::Url::parse(url) {
        Ok(target) => target,
        Err(_) => return format!("curl: invalid URL: {}", url),
    };

    // Only plain web schemes are fetchable
    let scheme = target.scheme();
    if scheme != "http" && scheme != "https" {
        return format!(
            "curl: invalid URL: {} (scheme '{}' not supported)",
            url, scheme
        );
    }

    match fetcher.get(target) {
        Ok(output) => output,
        Err(err) => {
            warn!("fetch of {} failed: {}", url, err);
            format!("curl: request failed: {}", err)
        }
    }
}
